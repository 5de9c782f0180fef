//! End-to-end tests over the public API: build a library on disk, index it,
//! and check the catalog, facet index, queries and statistics together.

use collection_viewer::descriptor::parse_date;
use collection_viewer::library::LibraryIndex;
use collection_viewer::query::{Query, filter_by};
use collection_viewer::types::{Collection, Facet};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_collection(root: &Path, rel: &str, descriptor: serde_json::Value, images: &[&str]) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("info.json"), descriptor.to_string()).unwrap();
    for image in images {
        fs::write(dir.join(image), "fake image").unwrap();
    }
}

fn titles(collections: &[&Collection]) -> Vec<String> {
    collections.iter().map(|c| c.title.clone()).collect()
}

/// A small mixed library: nested folders, shared and missing facets.
fn sample_library() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_collection(
        root,
        "2024/harbour",
        json!({
            "title": "Harbour",
            "date": "15.06.2024",
            "artists": ["Kira", "Tomo"],
            "genre": ["Landscape"],
            "group": ["Circle"]
        }),
        &["001.jpg", "002.jpg", "notes.txt"],
    );
    write_collection(
        root,
        "2024/market",
        json!({
            "title": "Market",
            "date": "15.06.2024",
            "artists": ["Tomo"],
            "characters": ["Mia"],
            "genre": ["Street", "Portrait"]
        }),
        &["a.png"],
    );
    write_collection(
        root,
        "old/sketches",
        json!({
            "title": "Sketches",
            "date": "03.02.2019",
            "artists": [],
            "genre": ["Portrait"]
        }),
        &["1.gif", "2.BMP", "3.tiff"],
    );
    tmp
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn empty_root() {
    let tmp = TempDir::new().unwrap();
    let index = LibraryIndex::open(tmp.path()).unwrap();

    assert!(index.catalog().is_empty());
    for facet in Facet::BROWSE {
        assert!(index.facets().values(facet).is_empty());
        assert_eq!(index.facets().columns(facet).sizes(), [0, 0, 0]);
    }
    let rows = index.statistics().rows();
    assert!(rows.contains(&("Number of Folders", "0".to_string())));
    assert!(rows.contains(&("Number of Pictures", "0".to_string())));
}

#[test]
fn sort_order() {
    let tmp = TempDir::new().unwrap();
    for (dir, title, date) in [
        ("z", "Zeta", "01.01.2023"),
        ("a", "Alpha", "15.06.2024"),
        ("b", "Bravo", "15.06.2024"),
    ] {
        write_collection(tmp.path(), dir, json!({"title": title, "date": date}), &[]);
    }

    let index = LibraryIndex::open(tmp.path()).unwrap();
    let order: Vec<(&str, &str)> = index
        .catalog()
        .iter()
        .map(|c| (c.date.as_str(), c.title.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("15.06.2024", "Alpha"),
            ("15.06.2024", "Bravo"),
            ("01.01.2023", "Zeta")
        ]
    );
}

#[test]
fn missing_and_empty_facets_get_placeholders() {
    let tmp = TempDir::new().unwrap();
    write_collection(
        tmp.path(),
        "set",
        json!({"title": "Set", "date": "01.01.2020", "artists": []}),
        &[],
    );

    let index = LibraryIndex::open(tmp.path()).unwrap();
    let c = &index.catalog()[0];
    assert_eq!(c.characters, ["No Characters"]);
    assert_eq!(c.artists, ["No Artists"]);
}

#[test]
fn eight_genres_split_three_three_two() {
    let tmp = TempDir::new().unwrap();
    let genres: Vec<String> = (1..=8).map(|i| format!("G{i}")).collect();
    write_collection(
        tmp.path(),
        "set",
        json!({"title": "Set", "date": "01.01.2020", "genre": genres}),
        &[],
    );

    let index = LibraryIndex::open(tmp.path()).unwrap();
    assert_eq!(index.facets().values(Facet::Genre).len(), 8);
    let columns = index.facets().columns(Facet::Genre);
    assert_eq!(columns.sizes(), [3, 3, 2]);
    assert_eq!(columns.column1, ["G1", "G2", "G3"]);
}

#[test]
fn include_filter_is_any_of() {
    let tmp = TempDir::new().unwrap();
    for (dir, title, artists) in [
        ("a", "A", vec!["X", "Y"]),
        ("b", "B", vec!["Y"]),
        ("c", "C", vec!["Z"]),
    ] {
        write_collection(
            tmp.path(),
            dir,
            json!({"title": title, "date": "01.01.2020", "artists": artists}),
            &[],
        );
    }

    let index = LibraryIndex::open(tmp.path()).unwrap();
    assert_eq!(titles(&index.filter_by(Facet::Artists, &["Y"])), ["A", "B"]);
    assert_eq!(titles(&index.filter_by(Facet::Artists, &["X", "Z"])), ["A", "C"]);
}

#[test]
fn composite_include_and_exclude() {
    let tmp = TempDir::new().unwrap();
    for (dir, title, genre, artist) in [
        ("p", "Passes", "G1", "Y"),
        ("q", "Excluded", "G1", "X"),
        ("r", "Wrong genre", "G2", "Y"),
    ] {
        write_collection(
            tmp.path(),
            dir,
            json!({"title": title, "date": "01.01.2020", "genre": [genre], "artists": [artist]}),
            &[],
        );
    }

    let index = LibraryIndex::open(tmp.path()).unwrap();
    let query = Query::new()
        .include(Facet::Genre, "G1")
        .exclude(Facet::Artists, "X");
    assert_eq!(titles(&index.search(&query)), ["Passes"]);
}

// =========================================================================
// Invariants over a mixed library
// =========================================================================

#[test]
fn every_facet_is_non_empty_and_sizes_match() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    assert_eq!(index.catalog().len(), 3);
    for c in index.catalog() {
        for facet in Facet::ALL {
            assert!(!c.facet(facet).is_empty(), "{} has empty {facet}", c.title);
        }
        assert_eq!(c.size, c.files.len());
    }
}

#[test]
fn catalog_obeys_sort_law() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    for pair in index.catalog().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let (da, db) = (parse_date(&a.date).unwrap(), parse_date(&b.date).unwrap());
        assert!(da > db || (da == db && a.title <= b.title));
    }
}

#[test]
fn columns_partition_values() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    for facet in Facet::BROWSE {
        let columns = index.facets().columns(facet);
        assert_eq!(columns.flatten(), index.facets().values(facet));
        let [a, b, c] = columns.sizes();
        assert!(a >= b && b >= c && a - c <= 1);
    }
}

#[test]
fn counts_match_filter_results() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    for facet in Facet::BROWSE {
        for value in index.facets().values(facet) {
            let hits = filter_by(index.catalog(), facet, &[value.as_str()]);
            assert_eq!(index.facets().counts(facet)[value], hits.len());
            assert!(hits.iter().all(|c| c.facet(facet).contains(value)));
        }
    }
}

#[test]
fn statistics_reflect_the_library() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    let stats = index.statistics();
    assert_eq!(stats.folders, 3);
    // notes.txt is not an image
    assert_eq!(stats.pictures, 6);
    // Kira, Tomo, No Artists
    assert_eq!(stats.artists, 3);
    // Landscape, Street, Portrait
    assert_eq!(stats.genre, 3);
    // Circle, No Group
    assert_eq!(stats.group, 2);
}

#[test]
fn exclusion_never_enlarges_results() {
    let tmp = sample_library();
    let index = LibraryIndex::open(tmp.path()).unwrap();
    let base = Query::new().include(Facet::Genre, "Portrait");
    let narrowed = base.clone().exclude(Facet::Artists, "Tomo");

    let wide = index.search(&base);
    let narrow = index.search(&narrowed);
    assert_eq!(titles(&wide), ["Market", "Sketches"]);
    assert_eq!(titles(&narrow), ["Sketches"]);
    assert!(narrow.iter().all(|c| wide.contains(c)));
}
