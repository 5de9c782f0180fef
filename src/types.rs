//! Shared types consumed by every layer: the facet dimensions and the
//! normalized [`Collection`] record.
//!
//! A collection is one directory holding a JSON descriptor plus the images
//! that sit next to it. The descriptor is an open-ended document, so the
//! record carries the named fields the viewer understands and keeps every
//! other key verbatim in [`Collection::extras`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A taggable dimension of a collection.
///
/// All six are normalized by the descriptor reader; only the four
/// [`Facet::BROWSE`] dimensions get browse pages, facet index entries and
/// statistics rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Artists,
    Characters,
    Genre,
    Group,
    Series,
    Type,
}

impl Facet {
    /// Every facet field a descriptor may carry, in descriptor key order.
    pub const ALL: [Facet; 6] = [
        Facet::Artists,
        Facet::Characters,
        Facet::Genre,
        Facet::Group,
        Facet::Series,
        Facet::Type,
    ];

    /// The dimensions with browse pages.
    pub const BROWSE: [Facet; 4] = [
        Facet::Artists,
        Facet::Characters,
        Facet::Genre,
        Facet::Group,
    ];

    /// Descriptor key for this facet.
    pub fn key(self) -> &'static str {
        match self {
            Facet::Artists => "artists",
            Facet::Characters => "characters",
            Facet::Genre => "genre",
            Facet::Group => "group",
            Facet::Series => "series",
            Facet::Type => "type",
        }
    }

    /// Placeholder value substituted when the descriptor leaves the field
    /// missing or empty. It is counted and filtered like any other value.
    pub fn sentinel(self) -> &'static str {
        match self {
            Facet::Artists => "No Artists",
            Facet::Characters => "No Characters",
            Facet::Genre => "No Genre",
            Facet::Group => "No Group",
            Facet::Series => "No Series",
            Facet::Type => "No Type",
        }
    }

    /// Human label used in headings and statistics rows.
    pub fn label(self) -> &'static str {
        match self {
            Facet::Artists => "Artists",
            Facet::Characters => "Characters",
            Facet::Genre => "Genre",
            Facet::Group => "Group",
            Facet::Series => "Series",
            Facet::Type => "Type",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown facet '{0}' (expected one of: artists, characters, genre, group, series, type)")]
pub struct FacetParseError(pub String);

impl FromStr for Facet {
    type Err = FacetParseError;

    /// Accepts the descriptor key, case-insensitively, plus the singular
    /// spellings used by the menu (`artist`, `character`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "artists" | "artist" => Ok(Facet::Artists),
            "characters" | "character" => Ok(Facet::Characters),
            "genre" | "genres" => Ok(Facet::Genre),
            "group" | "groups" => Ok(Facet::Group),
            "series" => Ok(Facet::Series),
            "type" | "types" => Ok(Facet::Type),
            _ => Err(FacetParseError(s.to_string())),
        }
    }
}

/// One directory's worth of images plus its descriptor.
///
/// Invariants upheld by the descriptor reader:
/// - every facet field is non-empty (missing or empty → single sentinel)
/// - `size == files.len()`
/// - `date` parses as `DD.MM.YYYY`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Absolute directory path; the collection's identity.
    pub folder: String,
    pub title: String,
    /// Calendar date as written in the descriptor (`DD.MM.YYYY`).
    pub date: String,
    pub artists: Vec<String>,
    pub characters: Vec<String>,
    pub genre: Vec<String>,
    pub group: Vec<String>,
    pub series: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    /// Image filenames relative to `folder`, ascending byte order.
    pub files: Vec<String>,
    pub size: usize,
    /// Descriptor keys the viewer does not interpret, in file order.
    #[serde(flatten)]
    pub extras: serde_json::Map<String, serde_json::Value>,
}

impl Collection {
    /// Values of one facet field.
    pub fn facet(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Artists => &self.artists,
            Facet::Characters => &self.characters,
            Facet::Genre => &self.genre,
            Facet::Group => &self.group,
            Facet::Series => &self.series,
            Facet::Type => &self.kind,
        }
    }

    pub(crate) fn facet_mut(&mut self, facet: Facet) -> &mut Vec<String> {
        match facet {
            Facet::Artists => &mut self.artists,
            Facet::Characters => &mut self.characters,
            Facet::Genre => &mut self.genre,
            Facet::Group => &mut self.group,
            Facet::Series => &mut self.series,
            Facet::Type => &mut self.kind,
        }
    }

    /// True when the field holds only the placeholder for its facet.
    pub fn is_placeholder(&self, facet: Facet) -> bool {
        matches!(self.facet(facet), [only] if only == facet.sentinel())
    }

    /// First image, used as the card cover.
    pub fn cover(&self) -> Option<&str> {
        self.files.first().map(String::as_str)
    }
}
