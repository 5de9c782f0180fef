//! Descriptor reading: one directory in, zero or more collections out.
//!
//! A directory becomes a collection when it directly contains a file whose
//! name ends in `.json`. The descriptor supplies the metadata; the images are
//! whatever sits next to it:
//!
//! ```text
//! library/
//! └── 2024/
//!     └── Harbour Lights/
//!         ├── info.json       # descriptor
//!         ├── 001.jpg
//!         ├── 002.PNG         # extension match ignores case
//!         └── notes.txt       # ignored
//! ```
//!
//! ## Normalization
//!
//! - `folder`, `files` and `size` are injected by the reader and override any
//!   same-named keys in the file.
//! - Facet fields that are missing, `null`, empty, or contain only empty
//!   strings become the single sentinel for that facet (`["No Artists"]`, …).
//!   A bare string is accepted as a one-element list.
//! - A missing `title` falls back to the directory name.
//! - `date` must be `DD.MM.YYYY`; descriptors without a valid date are
//!   reported and skipped so the canonical sort never sees them.
//! - Every other key is kept verbatim in [`Collection::extras`].
//!
//! Problems never abort the walk: each one becomes a [`ScanIssue`] and the
//! offending descriptor is dropped.

use crate::types::{Collection, Facet};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Suffix (case-sensitive) that marks a descriptor file.
pub const DESCRIPTOR_SUFFIX: &str = ".json";

/// Lowercased filename suffixes recognized as images. No magic-byte sniffing.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp"];

/// `chrono` format for descriptor dates (`DD.MM.YYYY`).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Keys owned by the reader; stripped from extras before injection.
const INJECTED_KEYS: &[&str] = &["folder", "files", "size"];

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("date '{0}' is not in DD.MM.YYYY format")]
    InvalidDate(String),
    #[error("descriptor has no date")]
    MissingDate,
}

/// A non-fatal problem met while reading the library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanIssue {
    #[error("malformed descriptor {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },
    #[error("cannot read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
    #[error("descriptor {} has invalid date '{date}'", path.display())]
    InvalidDate { path: PathBuf, date: String },
    #[error("descriptor {} has no date", path.display())]
    MissingDate { path: PathBuf },
    #[error("descriptor {} ignored: {} already has a descriptor", path.display(), folder.display())]
    DuplicateFolder { path: PathBuf, folder: PathBuf },
}

impl ScanIssue {
    /// Path of the file or directory the issue is about.
    pub fn path(&self) -> &Path {
        match self {
            ScanIssue::Malformed { path, .. }
            | ScanIssue::Unreadable { path, .. }
            | ScanIssue::InvalidDate { path, .. }
            | ScanIssue::MissingDate { path }
            | ScanIssue::DuplicateFolder { path, .. } => path,
        }
    }

    fn from_descriptor_error(path: &Path, err: DescriptorError) -> Self {
        let path = path.to_path_buf();
        match err {
            DescriptorError::Io(e) => ScanIssue::Unreadable {
                path,
                message: e.to_string(),
            },
            DescriptorError::Json(e) => ScanIssue::Malformed {
                path,
                message: e.to_string(),
            },
            DescriptorError::InvalidDate(date) => ScanIssue::InvalidDate { path, date },
            DescriptorError::MissingDate => ScanIssue::MissingDate { path },
        }
    }
}

/// Everything read from one directory.
#[derive(Debug, Default)]
pub struct DirectoryScan {
    pub collections: Vec<Collection>,
    pub issues: Vec<ScanIssue>,
}

/// A facet field as it may appear in a descriptor.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FacetList {
    One(String),
    Many(Vec<String>),
}

impl FacetList {
    fn into_values(self) -> Vec<String> {
        match self {
            FacetList::One(v) => vec![v],
            FacetList::Many(vs) => vs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDescriptor {
    title: Option<String>,
    date: Option<String>,
    artists: Option<FacetList>,
    characters: Option<FacetList>,
    genre: Option<FacetList>,
    group: Option<FacetList>,
    series: Option<FacetList>,
    #[serde(rename = "type")]
    kind: Option<FacetList>,
    #[serde(flatten)]
    extras: serde_json::Map<String, serde_json::Value>,
}

/// Image predicate: lowercased name ends with a known image suffix.
pub fn is_image(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Descriptor predicate: name ends with the literal `.json`.
pub fn is_descriptor(file_name: &str) -> bool {
    file_name.ends_with(DESCRIPTOR_SUFFIX)
}

/// Parse a `DD.MM.YYYY` date.
///
/// Day and month may have one or two digits; the year must have exactly
/// four. No surrounding whitespace.
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    if !date.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let year = date.rsplit('.').next()?;
    if year.len() != 4 {
        return None;
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}

/// Read every descriptor directly inside `dir`.
///
/// Descriptors are read in filename order. Only the first successfully read
/// descriptor yields a collection; later ones would duplicate the folder
/// identity and are reported as [`ScanIssue::DuplicateFolder`].
pub fn read_directory(dir: &Path) -> DirectoryScan {
    let mut scan = DirectoryScan::default();

    let (descriptors, images) = match list_directory(dir) {
        Ok(listing) => listing,
        Err(e) => {
            scan.issues.push(ScanIssue::Unreadable {
                path: dir.to_path_buf(),
                message: e.to_string(),
            });
            return scan;
        }
    };

    for descriptor in descriptors {
        match read_descriptor(&descriptor, dir, &images) {
            Ok(collection) if scan.collections.is_empty() => {
                debug!(
                    "read {} ({} images)",
                    descriptor.display(),
                    collection.size
                );
                scan.collections.push(collection);
            }
            Ok(_) => scan.issues.push(ScanIssue::DuplicateFolder {
                path: descriptor,
                folder: dir.to_path_buf(),
            }),
            Err(e) => scan
                .issues
                .push(ScanIssue::from_descriptor_error(&descriptor, e)),
        }
    }

    scan
}

/// Split a directory's entries into descriptor paths and image filenames,
/// both sorted ascending.
fn list_directory(dir: &Path) -> io::Result<(Vec<PathBuf>, Vec<String>)> {
    let mut descriptors = Vec::new();
    let mut images = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            debug!("skipping non UTF-8 filename in {}", dir.display());
            continue;
        };
        if is_descriptor(&name) {
            descriptors.push(path);
        } else if is_image(&name) {
            images.push(name);
        }
    }

    descriptors.sort();
    images.sort();
    Ok((descriptors, images))
}

/// Read and normalize one descriptor file.
///
/// `images` is the sorted image listing of `folder`; it becomes `files`.
pub fn read_descriptor(
    path: &Path,
    folder: &Path,
    images: &[String],
) -> Result<Collection, DescriptorError> {
    let content = fs::read_to_string(path)?;
    parse_descriptor(&content, folder, images)
}

/// Normalize descriptor text into a [`Collection`] rooted at `folder`.
pub fn parse_descriptor(
    content: &str,
    folder: &Path,
    images: &[String],
) -> Result<Collection, DescriptorError> {
    let raw: RawDescriptor = serde_json::from_str(content)?;

    let date = raw.date.ok_or(DescriptorError::MissingDate)?;
    if parse_date(&date).is_none() {
        return Err(DescriptorError::InvalidDate(date));
    }

    let title = raw.title.unwrap_or_else(|| {
        folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let mut extras = raw.extras;
    for key in INJECTED_KEYS {
        extras.remove(*key);
    }

    let mut collection = Collection {
        folder: folder.to_string_lossy().into_owned(),
        title,
        date,
        artists: Vec::new(),
        characters: Vec::new(),
        genre: Vec::new(),
        group: Vec::new(),
        series: Vec::new(),
        kind: Vec::new(),
        files: images.to_vec(),
        size: images.len(),
        extras,
    };

    let fields = [
        (Facet::Artists, raw.artists),
        (Facet::Characters, raw.characters),
        (Facet::Genre, raw.genre),
        (Facet::Group, raw.group),
        (Facet::Series, raw.series),
        (Facet::Type, raw.kind),
    ];
    for (facet, list) in fields {
        *collection.facet_mut(facet) = normalize_facet(facet, list);
    }

    Ok(collection)
}

fn normalize_facet(facet: Facet, list: Option<FacetList>) -> Vec<String> {
    let values: Vec<String> = list
        .map(FacetList::into_values)
        .unwrap_or_default()
        .into_iter()
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        vec![facet.sentinel().to_string()]
    } else {
        values
    }
}

/// The normalized descriptor a write-back would persist.
///
/// Named fields come first, then unknown keys in file order, then the
/// reader-injected `folder`, `files` and `size`. Nothing in the viewer
/// writes this to disk; it is exposed for inspection only.
pub fn descriptor_value(collection: &Collection) -> serde_json::Value {
    use serde_json::{Map, Value};

    fn strings(values: &[String]) -> Value {
        Value::Array(values.iter().cloned().map(Value::String).collect())
    }

    let mut map = Map::new();
    map.insert("title".into(), Value::String(collection.title.clone()));
    map.insert("date".into(), Value::String(collection.date.clone()));
    for facet in Facet::ALL {
        map.insert(facet.key().into(), strings(collection.facet(facet)));
    }
    for (key, value) in &collection.extras {
        map.insert(key.clone(), value.clone());
    }
    map.insert("folder".into(), Value::String(collection.folder.clone()));
    map.insert("files".into(), strings(&collection.files));
    map.insert("size".into(), Value::from(collection.size));
    Value::Object(map)
}
