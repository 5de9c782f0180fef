//! Catalog filtering: single-facet clicks and the composite search form.
//!
//! Every function here is pure and returns references into the catalog in
//! catalog order.
//!
//! ## Semantics
//!
//! - [`filter_by`] keeps a collection when its facet shares at least one
//!   value with the query set (any-of).
//! - A [`Query`] keeps a collection when, for every facet, the include set is
//!   empty or intersects the facet (any-of), and the exclude set is disjoint
//!   from it (none-of), and the free-text term matches.
//!
//! ## Free text
//!
//! How the term matches is a configuration choice ([`TextMatch`]):
//!
//! - `title`: case-insensitive substring of the title
//! - `facets`: every word of the term is, case-insensitively, a whole word
//!   of some browse-facet value; placeholders such as `"No Artists"` are not
//!   searched
//!
//! A blank term matches everything.

use crate::types::{Collection, Facet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Keep the collections whose `facet` contains any of `values`.
pub fn filter_by<'a, S: AsRef<str>>(
    catalog: &'a [Collection],
    facet: Facet,
    values: &[S],
) -> Vec<&'a Collection> {
    catalog
        .iter()
        .filter(|c| intersects(c.facet(facet), values.iter().map(|v| v.as_ref())))
        .collect()
}

fn intersects<'q>(field: &[String], mut wanted: impl Iterator<Item = &'q str>) -> bool {
    wanted.any(|w| field.iter().any(|v| v == w))
}

/// Rule for the free-text term of a [`Query`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    /// Case-insensitive substring of the title.
    #[default]
    Title,
    /// Whole words of the browse-facet values.
    Facets,
}

/// Composite include/exclude query across facets plus a free-text term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    include: BTreeMap<Facet, BTreeSet<String>>,
    exclude: BTreeMap<Facet, BTreeSet<String>>,
    text: String,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `facet` to contain `value` (or any other included value).
    pub fn include(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.include.entry(facet).or_default().insert(value.into());
        self
    }

    /// Reject collections whose `facet` contains `value`.
    pub fn exclude(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.exclude.entry(facet).or_default().insert(value.into());
        self
    }

    pub fn text(mut self, term: impl Into<String>) -> Self {
        self.text = term.into();
        self
    }

    pub fn included(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.include
            .get(&facet)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn excluded(&self, facet: Facet) -> impl Iterator<Item = &str> {
        self.exclude
            .get(&facet)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn term(&self) -> &str {
        &self.text
    }

    /// True when no facet is constrained and the term is blank.
    pub fn is_empty(&self) -> bool {
        self.include.values().all(BTreeSet::is_empty)
            && self.exclude.values().all(BTreeSet::is_empty)
            && self.text.trim().is_empty()
    }

    pub fn matches(&self, collection: &Collection, mode: TextMatch) -> bool {
        Facet::ALL.into_iter().all(|facet| {
            let field = collection.facet(facet);
            let include_ok = match self.include.get(&facet) {
                Some(wanted) if !wanted.is_empty() => {
                    intersects(field, wanted.iter().map(String::as_str))
                }
                _ => true,
            };
            include_ok && !intersects(field, self.excluded(facet))
        }) && text_matches(collection, &self.text, mode)
    }
}

/// Run `query` over `catalog`.
pub fn search<'a>(catalog: &'a [Collection], query: &Query, mode: TextMatch) -> Vec<&'a Collection> {
    catalog.iter().filter(|c| query.matches(c, mode)).collect()
}

fn text_matches(collection: &Collection, term: &str, mode: TextMatch) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    match mode {
        TextMatch::Title => collection
            .title
            .to_lowercase()
            .contains(&term.to_lowercase()),
        TextMatch::Facets => {
            let words: BTreeSet<String> = Facet::BROWSE
                .into_iter()
                .filter(|&facet| !collection.is_placeholder(facet))
                .flat_map(|facet| collection.facet(facet))
                .flat_map(|value| split_words(value))
                .collect();
            split_words(term).all(|w| words.contains(&w))
        }
    }
}

fn split_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
