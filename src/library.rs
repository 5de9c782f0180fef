//! The immutable library index every view reads from.
//!
//! Built once from a root directory: the sorted catalog, the facet index, the
//! statistics table and the scan report. Nothing mutates it afterwards; view
//! code borrows it.

use crate::catalog::{self, CatalogError, ScanReport};
use crate::config::{self, ConfigError, ViewerConfig};
use crate::facets::FacetIndex;
use crate::query::{self, Query};
use crate::stats::Statistics;
use crate::types::{Collection, Facet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Library root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LibraryIndex {
    root: PathBuf,
    config: ViewerConfig,
    catalog: Vec<Collection>,
    facets: FacetIndex,
    statistics: Statistics,
    report: ScanReport,
}

impl LibraryIndex {
    /// Load `config.toml` from `root` (if any) and index the library.
    pub fn open(root: &Path) -> Result<Self, LibraryError> {
        if !root.is_dir() {
            return Err(LibraryError::NotADirectory(root.to_path_buf()));
        }
        let config = config::load_config(root)?;
        Self::build(root, config)
    }

    /// Index the library under `root` with an explicit config.
    pub fn build(root: &Path, config: ViewerConfig) -> Result<Self, LibraryError> {
        let root = absolute_root(root);
        let (catalog, report) = catalog::build_catalog(&root, config.walk_options())?;
        Ok(Self::assemble(root, config, catalog, report))
    }

    /// Index an in-memory list of collections; it is sorted here.
    pub fn from_collections(
        root: &Path,
        config: ViewerConfig,
        collections: Vec<Collection>,
    ) -> Result<Self, LibraryError> {
        let catalog = catalog::sort_catalog(collections)?;
        Ok(Self::assemble(
            root.to_path_buf(),
            config,
            catalog,
            ScanReport::default(),
        ))
    }

    fn assemble(
        root: PathBuf,
        config: ViewerConfig,
        catalog: Vec<Collection>,
        report: ScanReport,
    ) -> Self {
        let facets = FacetIndex::build(&catalog);
        let statistics = Statistics::summarize(&root, &catalog, &facets);
        Self {
            root,
            config,
            catalog,
            facets,
            statistics,
            report,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &[Collection] {
        &self.catalog
    }

    pub fn facets(&self) -> &FacetIndex {
        &self.facets
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn report(&self) -> &ScanReport {
        &self.report
    }

    /// Look a collection up by folder, absolute or relative to the root.
    pub fn find(&self, folder: &str) -> Option<&Collection> {
        let trimmed = folder.trim_end_matches(['/', '\\']);
        let joined = self.root.join(trimmed);
        self.catalog
            .iter()
            .find(|c| c.folder == trimmed || Path::new(&c.folder) == joined)
    }

    pub fn filter_by<S: AsRef<str>>(&self, facet: Facet, values: &[S]) -> Vec<&Collection> {
        query::filter_by(&self.catalog, facet, values)
    }

    /// Run a composite query with the configured text rule.
    pub fn search(&self, query: &Query) -> Vec<&Collection> {
        query::search(&self.catalog, query, self.config.search.text_match)
    }
}

fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
