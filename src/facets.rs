//! Facet aggregation for the browse pages.
//!
//! For each browse facet (artists, characters, genre, group) the index holds:
//!
//! - **values**: every distinct value, ascending byte order
//! - **counts**: how many collections carry each value (a value listed twice
//!   in one collection counts once)
//! - **columns**: `values` cut into three contiguous slices for the
//!   three-column browse layout
//!
//! ## Column split
//!
//! With `n` values, `base = n / 3` and `r = n % 3`, the first `r` columns get
//! `base + 1` values and the rest get `base`:
//!
//! ```text
//! n = 8  →  [3, 3, 2]
//! n = 7  →  [3, 2, 2]
//! n = 6  →  [2, 2, 2]
//! n = 0  →  [0, 0, 0]
//! ```
//!
//! Sentinel values (`"No Artists"` and friends) are ordinary values here.

use crate::types::{Collection, Facet};
use std::collections::{BTreeMap, BTreeSet};

/// Three contiguous slices of a sorted value list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Columns {
    pub column1: Vec<String>,
    pub column2: Vec<String>,
    pub column3: Vec<String>,
}

impl Columns {
    /// The columns left to right.
    pub fn as_array(&self) -> [&[String]; 3] {
        [&self.column1, &self.column2, &self.column3]
    }

    pub fn sizes(&self) -> [usize; 3] {
        [self.column1.len(), self.column2.len(), self.column3.len()]
    }

    /// Concatenation of the three columns.
    pub fn flatten(&self) -> Vec<String> {
        self.as_array().concat()
    }
}

/// Split `values` into three columns, remainder front-loaded.
pub fn split_into_columns(values: &[String]) -> Columns {
    let base = values.len() / 3;
    let remainder = values.len() % 3;

    let mut rest = values;
    let mut take = |i: usize| {
        let len = base + usize::from(i < remainder);
        let (head, tail) = rest.split_at(len);
        rest = tail;
        head.to_vec()
    };

    Columns {
        column1: take(0),
        column2: take(1),
        column3: take(2),
    }
}

/// Aggregates for one facet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetEntry {
    pub values: Vec<String>,
    pub counts: BTreeMap<String, usize>,
    pub columns: Columns,
}

impl FacetEntry {
    /// Aggregate `facet` over `catalog`.
    pub fn build(catalog: &[Collection], facet: Facet) -> Self {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for collection in catalog {
            let distinct: BTreeSet<&String> = collection.facet(facet).iter().collect();
            for value in distinct {
                *counts.entry(value.clone()).or_default() += 1;
            }
        }

        let values: Vec<String> = counts.keys().cloned().collect();
        let columns = split_into_columns(&values);
        Self {
            values,
            counts,
            columns,
        }
    }

    /// Occurrence count, zero for values no collection carries.
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }
}

/// Per-facet aggregates for the browse facets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetIndex {
    entries: BTreeMap<Facet, FacetEntry>,
}

impl FacetIndex {
    pub fn build(catalog: &[Collection]) -> Self {
        let entries = Facet::BROWSE
            .into_iter()
            .map(|facet| (facet, FacetEntry::build(catalog, facet)))
            .collect();
        Self { entries }
    }

    /// Aggregates for `facet`. Non-browse facets have an empty entry.
    pub fn entry(&self, facet: Facet) -> &FacetEntry {
        static EMPTY: FacetEntry = FacetEntry {
            values: Vec::new(),
            counts: BTreeMap::new(),
            columns: Columns {
                column1: Vec::new(),
                column2: Vec::new(),
                column3: Vec::new(),
            },
        };
        self.entries.get(&facet).unwrap_or(&EMPTY)
    }

    pub fn values(&self, facet: Facet) -> &[String] {
        &self.entry(facet).values
    }

    pub fn counts(&self, facet: Facet) -> &BTreeMap<String, usize> {
        &self.entry(facet).counts
    }

    pub fn columns(&self, facet: Facet) -> &Columns {
        &self.entry(facet).columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    fn names(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("v{i:02}")).collect()
    }

    #[test]
    fn columns_front_load_remainder() {
        assert_eq!(split_into_columns(&names(8)).sizes(), [3, 3, 2]);
        assert_eq!(split_into_columns(&names(7)).sizes(), [3, 2, 2]);
        assert_eq!(split_into_columns(&names(6)).sizes(), [2, 2, 2]);
        assert_eq!(split_into_columns(&names(2)).sizes(), [1, 1, 0]);
        assert_eq!(split_into_columns(&names(1)).sizes(), [1, 0, 0]);
        assert_eq!(split_into_columns(&names(0)).sizes(), [0, 0, 0]);
    }

    #[test]
    fn columns_concatenate_back_to_values() {
        for n in 0..20 {
            let values = names(n);
            let columns = split_into_columns(&values);
            assert_eq!(columns.flatten(), values, "n = {n}");
            let [a, b, c] = columns.sizes();
            assert!(a >= b && b >= c && a - c <= 1, "n = {n}: {:?}", columns.sizes());
        }
    }

    #[test]
    fn values_are_sorted_and_unique() {
        let catalog = vec![
            collection("A", "01.01.2020").with(Facet::Artists, &["Zed", "amy"]),
            collection("B", "01.01.2020").with(Facet::Artists, &["Bob", "Zed"]),
        ];
        let index = FacetIndex::build(&catalog);
        assert_eq!(index.values(Facet::Artists), ["Bob", "Zed", "amy"]);
    }

    #[test]
    fn counts_collections_not_occurrences() {
        let catalog = vec![
            collection("A", "01.01.2020").with(Facet::Genre, &["Drama", "Drama"]),
            collection("B", "01.01.2020").with(Facet::Genre, &["Drama", "Comedy"]),
            collection("C", "01.01.2020"),
        ];
        let index = FacetIndex::build(&catalog);
        let genre = index.entry(Facet::Genre);
        assert_eq!(genre.count("Drama"), 2);
        assert_eq!(genre.count("Comedy"), 1);
        assert_eq!(genre.count("No Genre"), 1);
        assert_eq!(genre.count("Horror"), 0);
    }

    #[test]
    fn count_law_holds_for_every_value() {
        let catalog = vec![
            collection("A", "01.01.2020").with(Facet::Group, &["G1", "G2"]),
            collection("B", "01.01.2020").with(Facet::Group, &["G2"]),
            collection("C", "01.01.2020").with(Facet::Group, &["G3", "G1", "G1"]),
        ];
        let index = FacetIndex::build(&catalog);
        for value in index.values(Facet::Group) {
            let expected = catalog
                .iter()
                .filter(|c| c.group.contains(value))
                .count();
            assert_eq!(index.counts(Facet::Group)[value], expected, "{value}");
        }
    }

    #[test]
    fn empty_catalog_has_empty_entries() {
        let index = FacetIndex::build(&[]);
        for facet in Facet::BROWSE {
            assert!(index.values(facet).is_empty());
            assert_eq!(index.columns(facet).sizes(), [0, 0, 0]);
        }
    }

    #[test]
    fn series_and_type_are_not_indexed() {
        let catalog = vec![collection("A", "01.01.2020").with(Facet::Series, &["S"])];
        let index = FacetIndex::build(&catalog);
        assert!(index.values(Facet::Series).is_empty());
        assert!(index.values(Facet::Type).is_empty());
    }

    #[test]
    fn eight_genres_split_three_three_two() {
        let genres: Vec<String> = names(8);
        let refs: Vec<&str> = genres.iter().map(String::as_str).collect();
        let catalog = vec![collection("A", "01.01.2020").with(Facet::Genre, &refs)];
        let index = FacetIndex::build(&catalog);
        let columns = index.columns(Facet::Genre);
        assert_eq!(columns.sizes(), [3, 3, 2]);
        assert_eq!(columns.column3, vec!["v07", "v08"]);
    }
}
