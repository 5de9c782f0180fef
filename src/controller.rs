//! View controller: actions in, view states out.
//!
//! Views never hold selection state or call each other. They dispatch an
//! [`Action`] to the [`Controller`], which owns the navigation state (current
//! listing, page, open collection, image cursor) and borrows the immutable
//! [`LibraryIndex`]. Each dispatch returns the next [`View`] to render.
//!
//! ```text
//! Statistics ─┐
//! Home ───────┼─► Grid ──OpenCollection──► Detail ──OpenImage──► Image
//! Select ─────┤    ▲  NextPage/PreviousPage   ▲       CloseImage    │
//! Search ─────┘    └──────────────────────────┘◄────────────────────┘
//! Browse ───────► Browse (three columns, Select from there)
//! ```

use crate::facets::{Columns, FacetEntry};
use crate::library::LibraryIndex;
use crate::query::Query;
use crate::stats::Statistics;
use crate::types::{Collection, Facet};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ControllerError {
    #[error("No collection in folder: {0}")]
    UnknownCollection(String),
    #[error("Page {shown} out of range (1-{page_count})", shown = .page + 1)]
    PageOutOfRange { page: usize, page_count: usize },
    #[error("No collection is open")]
    NoCurrentCollection,
    #[error("No image is open")]
    NoCurrentImage,
    #[error("Collection has no images: {0}")]
    NoImages(String),
    #[error("Image {shown} out of range (collection has {size})", shown = .index + 1)]
    ImageOutOfRange { index: usize, size: usize },
}

/// Everything a view can ask the controller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Startup statistics page.
    Statistics,
    /// Grid of every collection, first page.
    Home,
    /// Jump to a 0-based page of the current listing.
    Page(usize),
    NextPage,
    PreviousPage,
    /// Three-column page for one facet.
    Browse(Facet),
    /// A facet value was clicked: list the collections carrying it.
    Select { facet: Facet, value: String },
    /// Submit the search form.
    Search(Query),
    /// Open the detail view of the collection in this folder.
    OpenCollection(String),
    /// Open a 0-based image of the open collection fullscreen.
    OpenImage(usize),
    NextImage,
    PreviousImage,
    /// Leave the image viewer, back to the detail view.
    CloseImage,
}

/// One page of the collection grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridPage<'a> {
    pub heading: String,
    pub collections: Vec<&'a Collection>,
    /// 0-based.
    pub page: usize,
    pub page_count: usize,
    /// Listing position of the first collection on this page.
    pub offset: usize,
    /// Size of the whole listing, all pages.
    pub total: usize,
}

impl GridPage<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }
}

/// A facet's browse page.
#[derive(Debug, Clone, PartialEq)]
pub struct BrowsePage<'a> {
    pub facet: Facet,
    pub columns: &'a Columns,
    pub counts: &'a BTreeMap<String, usize>,
}

impl<'a> BrowsePage<'a> {
    fn new(facet: Facet, entry: &'a FacetEntry) -> Self {
        Self {
            facet,
            columns: &entry.columns,
            counts: &entry.counts,
        }
    }
}

/// The fullscreen viewer's position.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePosition<'a> {
    pub collection: &'a Collection,
    /// 0-based.
    pub index: usize,
    pub file: &'a str,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    Statistics(&'a Statistics),
    Grid(GridPage<'a>),
    Browse(BrowsePage<'a>),
    Detail(&'a Collection),
    Image(ImagePosition<'a>),
}

#[derive(Debug)]
pub struct Controller<'a> {
    index: &'a LibraryIndex,
    page_size: usize,
    heading: String,
    listing: Vec<&'a Collection>,
    page: usize,
    current: Option<&'a Collection>,
    image: Option<usize>,
}

impl<'a> Controller<'a> {
    pub fn new(index: &'a LibraryIndex) -> Self {
        Self {
            index,
            page_size: index.config().listing.page_size.max(1),
            heading: all_heading(),
            listing: index.catalog().iter().collect(),
            page: 0,
            current: None,
            image: None,
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Result<View<'a>, ControllerError> {
        match action {
            Action::Statistics => Ok(View::Statistics(self.index.statistics())),
            Action::Home => {
                self.show_listing(all_heading(), self.index.catalog().iter().collect());
                Ok(View::Grid(self.grid()))
            }
            Action::Page(page) => {
                let page_count = self.page_count();
                if page >= page_count {
                    return Err(ControllerError::PageOutOfRange { page, page_count });
                }
                self.page = page;
                Ok(View::Grid(self.grid()))
            }
            Action::NextPage => {
                self.page = (self.page + 1).min(self.page_count() - 1);
                Ok(View::Grid(self.grid()))
            }
            Action::PreviousPage => {
                self.page = self.page.saturating_sub(1);
                Ok(View::Grid(self.grid()))
            }
            Action::Browse(facet) => Ok(View::Browse(BrowsePage::new(
                facet,
                self.index.facets().entry(facet),
            ))),
            Action::Select { facet, value } => {
                let listing = self.index.filter_by(facet, &[value.as_str()]);
                self.show_listing(format!("{}: {}", facet.label(), value), listing);
                Ok(View::Grid(self.grid()))
            }
            Action::Search(query) => {
                let listing = self.index.search(&query);
                self.show_listing(search_heading(&query), listing);
                Ok(View::Grid(self.grid()))
            }
            Action::OpenCollection(folder) => {
                let collection = self
                    .index
                    .find(&folder)
                    .ok_or(ControllerError::UnknownCollection(folder))?;
                self.current = Some(collection);
                self.image = None;
                Ok(View::Detail(collection))
            }
            Action::OpenImage(index) => {
                let collection = self.current.ok_or(ControllerError::NoCurrentCollection)?;
                if collection.size == 0 {
                    return Err(ControllerError::NoImages(collection.folder.clone()));
                }
                if index >= collection.size {
                    return Err(ControllerError::ImageOutOfRange {
                        index,
                        size: collection.size,
                    });
                }
                self.image = Some(index);
                self.image_view()
            }
            Action::NextImage => self.step_image(1),
            Action::PreviousImage => self.step_image(-1),
            Action::CloseImage => {
                let collection = self.current.ok_or(ControllerError::NoCurrentCollection)?;
                self.image = None;
                Ok(View::Detail(collection))
            }
        }
    }

    /// The grid page currently selected.
    pub fn grid(&self) -> GridPage<'a> {
        let start = (self.page * self.page_size).min(self.listing.len());
        let end = (start + self.page_size).min(self.listing.len());
        GridPage {
            heading: self.heading.clone(),
            collections: self.listing[start..end].to_vec(),
            page: self.page,
            page_count: self.page_count(),
            offset: start,
            total: self.listing.len(),
        }
    }

    fn page_count(&self) -> usize {
        self.listing.len().div_ceil(self.page_size).max(1)
    }

    fn show_listing(&mut self, heading: String, listing: Vec<&'a Collection>) {
        self.heading = heading;
        self.listing = listing;
        self.page = 0;
    }

    fn step_image(&mut self, delta: isize) -> Result<View<'a>, ControllerError> {
        let collection = self.current.ok_or(ControllerError::NoCurrentCollection)?;
        let index = self.image.ok_or(ControllerError::NoCurrentImage)?;
        let size = collection.size as isize;
        self.image = Some((index as isize + delta).rem_euclid(size) as usize);
        self.image_view()
    }

    fn image_view(&self) -> Result<View<'a>, ControllerError> {
        let collection = self.current.ok_or(ControllerError::NoCurrentCollection)?;
        let index = self.image.ok_or(ControllerError::NoCurrentImage)?;
        let file = collection
            .files
            .get(index)
            .ok_or(ControllerError::ImageOutOfRange {
                index,
                size: collection.size,
            })?;
        Ok(View::Image(ImagePosition {
            collection,
            index,
            file,
            path: PathBuf::from(&collection.folder).join(file),
        }))
    }
}

fn all_heading() -> String {
    "All Collections".to_string()
}

fn search_heading(query: &Query) -> String {
    let mut parts = Vec::new();
    for facet in Facet::ALL {
        for value in query.included(facet) {
            parts.push(format!("+{}:{}", facet, value));
        }
        for value in query.excluded(facet) {
            parts.push(format!("-{}:{}", facet, value));
        }
    }
    if !query.term().trim().is_empty() {
        parts.push(format!("\"{}\"", query.term().trim()));
    }
    if parts.is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {}", parts.join(" "))
    }
}
