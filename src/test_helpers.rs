//! Shared test utilities for the collection-viewer test suite.
//!
//! Fixture writers build library trees on disk; constructors build
//! in-memory collections for sorting, filtering and view tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_collection(
//!     tmp.path(),
//!     "2024/harbour",
//!     &DescriptorSpec::new("Harbour", "15.06.2024").facet(Facet::Artists, &["Kira"]),
//!     &["001.jpg", "002.jpg"],
//! );
//!
//! let c = collection("Harbour", "15.06.2024").with(Facet::Genre, &["Landscape"]);
//! assert_eq!(c.genre, ["Landscape"]);
//! ```

use std::fs;
use std::path::Path;

use crate::types::{Collection, Facet};

// =========================================================================
// Descriptor fixtures
// =========================================================================

/// Contents of a descriptor file, built up field by field.
#[derive(Debug, Clone)]
pub struct DescriptorSpec {
    value: serde_json::Map<String, serde_json::Value>,
}

impl DescriptorSpec {
    pub fn new(title: &str, date: &str) -> Self {
        let mut value = serde_json::Map::new();
        value.insert("title".into(), title.into());
        value.insert("date".into(), date.into());
        Self { value }
    }

    pub fn facet(mut self, facet: Facet, values: &[&str]) -> Self {
        self.value.insert(facet.key().into(), values.to_vec().into());
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.value).unwrap()
    }
}

/// Write a descriptor named `filename` into an existing `dir`.
pub fn write_descriptor(dir: &Path, filename: &str, spec: &DescriptorSpec) {
    fs::write(dir.join(filename), spec.to_json()).unwrap();
}

/// Create `root/rel` with an `info.json` and placeholder image files.
///
/// `rel == "."` writes into the root itself.
pub fn write_collection(root: &Path, rel: &str, spec: &DescriptorSpec, images: &[&str]) {
    let dir = if rel == "." {
        root.to_path_buf()
    } else {
        root.join(rel)
    };
    fs::create_dir_all(&dir).unwrap();
    write_descriptor(&dir, "info.json", spec);
    for image in images {
        fs::write(dir.join(image), "fake image").unwrap();
    }
}

// =========================================================================
// In-memory collections
// =========================================================================

/// A collection in `/lib/{title}` with placeholder facets and no images.
pub fn collection(title: &str, date: &str) -> Collection {
    let placeholder = |f: Facet| vec![f.sentinel().to_string()];
    Collection {
        folder: format!("/lib/{title}"),
        title: title.to_string(),
        date: date.to_string(),
        artists: placeholder(Facet::Artists),
        characters: placeholder(Facet::Characters),
        genre: placeholder(Facet::Genre),
        group: placeholder(Facet::Group),
        series: placeholder(Facet::Series),
        kind: placeholder(Facet::Type),
        files: Vec::new(),
        size: 0,
        extras: serde_json::Map::new(),
    }
}

impl Collection {
    /// Replace one facet's values.
    pub fn with(mut self, facet: Facet, values: &[&str]) -> Self {
        *self.facet_mut(facet) = values.iter().map(|v| v.to_string()).collect();
        self
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn titles(catalog: &[Collection]) -> Vec<&str> {
    catalog.iter().map(|c| c.title.as_str()).collect()
}

pub fn titles_of<'a>(collections: &[&'a Collection]) -> Vec<&'a str> {
    collections.iter().map(|c| c.title.as_str()).collect()
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a collection by title. Panics if not found.
pub fn find_collection<'a>(catalog: &'a [Collection], title: &str) -> &'a Collection {
    catalog
        .iter()
        .find(|c| c.title == title)
        .unwrap_or_else(|| panic!("collection '{title}' not found. Available: {:?}", titles(catalog)))
}
