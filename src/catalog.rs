//! Library discovery and the canonical catalog order.
//!
//! The walk visits every directory under the root exactly once, pre-order,
//! siblings in filename order, and hands each one to
//! [`descriptor::read_directory`](crate::descriptor::read_directory). Reading
//! and ordering are separate steps so that [`sort_catalog`] can be exercised
//! on hand-built lists.
//!
//! ## Canonical order
//!
//! Newest date first, then title ascending (byte order, so case-sensitive).
//! The sort is stable: collections with equal date and title keep discovery
//! order.
//!
//! ## Failure handling
//!
//! Unreadable directories and broken descriptors are recorded in the
//! [`ScanReport`] and logged; the walk carries on. The only hard failure is a
//! collection whose date does not parse reaching [`sort_catalog`], which the
//! reader prevents for anything it produced itself.

use crate::descriptor::{self, ScanIssue, parse_date};
use crate::types::Collection;
use std::cmp::Ordering;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("collection '{title}' in {folder} has unparseable date '{date}'")]
    InvalidDate {
        folder: String,
        title: String,
        date: String,
    },
}

/// Knobs for the discovery walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkOptions {
    /// Descend into symlinked directories.
    pub follow_links: bool,
}

/// What the walk saw besides the collections themselves.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Directories visited, root included.
    pub directories: usize,
    /// Problems met along the way, in walk order.
    pub issues: Vec<ScanIssue>,
}

impl ScanReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Record a walk error, unless the directory reader has just reported
    /// the same directory as unreadable.
    fn push_walk_error(&mut self, issue: ScanIssue) {
        if let Some(last) = self.issues.last() {
            if matches!(last, ScanIssue::Unreadable { .. }) && last.path() == issue.path() {
                return;
            }
        }
        warn!("{issue}");
        self.issues.push(issue);
    }
}

/// Walk `root` and read every descriptor, in discovery order.
pub fn discover(root: &Path, options: WalkOptions) -> (Vec<Collection>, ScanReport) {
    let mut collections = Vec::new();
    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                report.push_walk_error(ScanIssue::Unreadable {
                    path,
                    message: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        report.directories += 1;
        let scan = descriptor::read_directory(entry.path());
        for issue in &scan.issues {
            warn!("{issue}");
        }
        collections.extend(scan.collections);
        report.issues.extend(scan.issues);
    }

    info!(
        "scanned {} directories under {}: {} collections, {} issues",
        report.directories,
        root.display(),
        collections.len(),
        report.issues.len()
    );

    (collections, report)
}

/// Order collections newest first, then by title.
///
/// Fails without reordering anything if any date is not `DD.MM.YYYY`.
pub fn sort_catalog(collections: Vec<Collection>) -> Result<Vec<Collection>, CatalogError> {
    let mut keyed = Vec::with_capacity(collections.len());
    for collection in collections {
        let Some(date) = parse_date(&collection.date) else {
            return Err(CatalogError::InvalidDate {
                folder: collection.folder,
                title: collection.title,
                date: collection.date,
            });
        };
        keyed.push((date, collection));
    }

    keyed.sort_by(|(date_a, a), (date_b, b)| canonical_order(*date_a, a, *date_b, b));
    Ok(keyed.into_iter().map(|(_, c)| c).collect())
}

fn canonical_order(
    date_a: chrono::NaiveDate,
    a: &Collection,
    date_b: chrono::NaiveDate,
    b: &Collection,
) -> Ordering {
    date_b.cmp(&date_a).then_with(|| a.title.cmp(&b.title))
}

/// Discover and sort: the catalog for `root`.
pub fn build_catalog(
    root: &Path,
    options: WalkOptions,
) -> Result<(Vec<Collection>, ScanReport), CatalogError> {
    let (collections, report) = discover(root, options);
    let catalog = sort_catalog(collections)?;
    Ok((catalog, report))
}
