//! # Collection Viewer
//!
//! Index a library of image collections and answer faceted queries over it.
//! Your filesystem is the data source: every directory holding a JSON
//! descriptor becomes a collection, its image files become the collection's
//! pages, and the descriptor's facet lists (artists, characters, genre,
//! group, series, type) become the dimensions you browse and filter by.
//!
//! # Architecture: Build Once, Read Everywhere
//!
//! ```text
//! 1. Discover   library/   →  Vec<Collection> + ScanReport   (walk + descriptor reader)
//! 2. Index      catalog    →  LibraryIndex                   (sort, facets, statistics)
//! 3. Navigate   Action     →  View                           (controller over the index)
//! ```
//!
//! The index is immutable once built. View state (current listing, page,
//! open collection, image cursor) lives in the [`controller::Controller`],
//! which borrows the index; views only dispatch actions and render the
//! result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Facet` dimensions and the `Collection` record |
//! | [`descriptor`] | Per-directory descriptor reader: JSON, image listing, date and facet normalization |
//! | [`catalog`] | Recursive discovery and newest-first catalog ordering |
//! | [`facets`] | Distinct values, occurrence counts and three-column layout per facet |
//! | [`query`] | Single-facet filter and the composite include/exclude/text search |
//! | [`stats`] | Startup statistics table |
//! | [`config`] | Optional `config.toml` in the library root, layered over stock defaults |
//! | [`library`] | The assembled, immutable `LibraryIndex` |
//! | [`controller`] | Action/view command bus: grid paging, browse, detail, image viewer |
//! | [`opener`] | Open a collection folder in the platform file manager |
//! | [`output`] | Text rendering of every view |
//!
//! # Design Decisions
//!
//! ## Placeholders Are Values
//!
//! A descriptor that leaves a facet missing or empty gets a single sentinel
//! value (`"No Artists"`, `"No Genre"`, ...). Sentinels sort, count and filter
//! like any other value, so "collections without an artist" is just another
//! browse entry.
//!
//! ## Broken Descriptors Don't Stop Discovery
//!
//! Malformed JSON, unreadable directories and unparseable dates are recorded
//! as [`descriptor::ScanIssue`]s and the walk continues. The `issues`
//! subcommand lists them.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod descriptor;
pub mod facets;
pub mod library;
pub mod opener;
pub mod output;
pub mod query;
pub mod stats;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
