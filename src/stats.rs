//! Startup statistics page.
//!
//! The table is rendered row for row, so [`Statistics::rows`] order is fixed:
//!
//! ```text
//! Starting Folder       /home/me/library
//! Number of Folders     42
//! Number of Artists     17
//! Number of Characters  30
//! Number of Genre       8
//! Number of Group       5
//! Number of Pictures    1234
//! ```
//!
//! Facet counts are distinct values, placeholders included.

use crate::facets::FacetIndex;
use crate::types::{Collection, Facet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub root: PathBuf,
    pub folders: usize,
    pub artists: usize,
    pub characters: usize,
    pub genre: usize,
    pub group: usize,
    pub pictures: usize,
}

impl Statistics {
    pub fn summarize(root: &Path, catalog: &[Collection], facets: &FacetIndex) -> Self {
        Self {
            root: root.to_path_buf(),
            folders: catalog.len(),
            artists: facets.values(Facet::Artists).len(),
            characters: facets.values(Facet::Characters).len(),
            genre: facets.values(Facet::Genre).len(),
            group: facets.values(Facet::Group).len(),
            pictures: catalog.iter().map(|c| c.size).sum(),
        }
    }

    /// Key/value rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Starting Folder", self.root.display().to_string()),
            ("Number of Folders", self.folders.to_string()),
            ("Number of Artists", self.artists.to_string()),
            ("Number of Characters", self.characters.to_string()),
            ("Number of Genre", self.genre.to_string()),
            ("Number of Group", self.group.to_string()),
            ("Number of Pictures", self.pictures.to_string()),
        ]
    }
}
