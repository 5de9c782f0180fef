//! Text rendering for every view.
//!
//! # Entity Display Contract
//!
//! Collections follow the same two-level pattern wherever they appear:
//!
//! 1. **Header line**: positional index + title + image count
//! 2. **Context lines**: indented `Date:`, facet values and `Source:`
//!
//! ```text
//! All Collections (page 1/2, 31 collections)
//! 001 Harbour Lights (24 images)
//!     Date: 15.06.2024
//!     Artists: Kira, Tomo
//!     Genre: Landscape
//!     Source: /home/me/library/2024/harbour
//! ...
//! Next: page 2
//! ```
//!
//! Browse pages lay the three columns side by side with occurrence counts:
//!
//! ```text
//! Artists (5)
//! Amy (2)   Kira (4)  Zed (1)
//! Bob (1)   Tomo (3)
//! ```
//!
//! # Architecture
//!
//! Every view has a `format_*` function returning `Vec<String>`; format
//! functions are pure. [`print_lines`] is the only place that writes.

use crate::catalog::ScanReport;
use crate::controller::{BrowsePage, GridPage, ImagePosition, View};
use crate::stats::Statistics;
use crate::types::{Collection, Facet};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a collection header: positional index, title and image count.
///
/// ```text
/// 001 Harbour Lights (24 images)
/// 002 Sketches (1 image)
/// ```
fn entity_header(index: usize, title: &str, images: usize) -> String {
    let noun = if images == 1 { "image" } else { "images" };
    format!("{} {} ({} {})", format_index(index), title, images, noun)
}

fn facet_line(collection: &Collection, facet: Facet) -> String {
    format!("{}: {}", facet.label(), collection.facet(facet).join(", "))
}

// ============================================================================
// Views
// ============================================================================

/// Startup statistics as an aligned two-column table.
pub fn format_statistics(stats: &Statistics) -> Vec<String> {
    let rows = stats.rows();
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    rows.iter()
        .map(|(key, value)| format!("{key:<width$}  {value}"))
        .collect()
}

/// One grid page with card context lines and pager hints.
pub fn format_grid(page: &GridPage<'_>) -> Vec<String> {
    let mut lines = vec![format!(
        "{} (page {}/{}, {} collections)",
        page.heading,
        page.page + 1,
        page.page_count,
        page.total
    )];

    for (i, collection) in page.collections.iter().enumerate() {
        let base = indent(1);
        lines.push(entity_header(
            page.offset + i + 1,
            &collection.title,
            collection.size,
        ));
        lines.push(format!("{base}Date: {}", collection.date));
        lines.push(format!("{base}{}", facet_line(collection, Facet::Artists)));
        lines.push(format!("{base}{}", facet_line(collection, Facet::Genre)));
        lines.push(format!("{base}Source: {}", collection.folder));
    }

    if page.has_previous() {
        lines.push(format!("Previous: page {}", page.page));
    }
    if page.has_next() {
        lines.push(format!("Next: page {}", page.page + 2));
    }
    lines
}

/// Three columns side by side, `value (count)` per cell.
pub fn format_browse(page: &BrowsePage<'_>) -> Vec<String> {
    let columns = page.columns.as_array();
    let total: usize = columns.iter().map(|c| c.len()).sum();
    let mut lines = vec![format!("{} ({})", page.facet.label(), total)];

    let cells: Vec<Vec<String>> = columns
        .iter()
        .map(|column| {
            column
                .iter()
                .map(|value| {
                    let count = page.counts.get(value).copied().unwrap_or(0);
                    format!("{value} ({count})")
                })
                .collect()
        })
        .collect();
    let widths: Vec<usize> = cells
        .iter()
        .map(|c| c.iter().map(|s| s.chars().count()).max().unwrap_or(0))
        .collect();

    // the first column is always the longest
    for row in 0..cells[0].len() {
        let mut line = String::new();
        for (col, column) in cells.iter().enumerate() {
            let Some(cell) = column.get(row) else { break };
            if col > 0 {
                line.push_str("  ");
            }
            let pad = widths[col] - cell.chars().count();
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        }
        lines.push(line.trim_end().to_string());
    }
    lines
}

/// Detail view: metadata, unknown descriptor keys, then the image list.
pub fn format_detail(collection: &Collection) -> Vec<String> {
    let mut lines = vec![collection.title.clone()];
    let base = indent(1);
    lines.push(format!("{base}Date: {}", collection.date));
    for facet in Facet::ALL {
        lines.push(format!("{base}{}", facet_line(collection, facet)));
    }
    for (key, value) in &collection.extras {
        let shown = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(format!("{base}{key}: {shown}"));
    }
    lines.push(format!("{base}Source: {}", collection.folder));

    lines.push(format!("{base}Images ({})", collection.size));
    for (i, file) in collection.files.iter().enumerate() {
        lines.push(format!("{}{} {}", indent(2), format_index(i + 1), file));
    }
    lines
}

/// Image viewer position.
///
/// ```text
/// Harbour Lights [3/24] 003.jpg
///     Source: /home/me/library/2024/harbour/003.jpg
/// ```
pub fn format_image(position: &ImagePosition<'_>) -> Vec<String> {
    vec![
        format!(
            "{} [{}/{}] {}",
            position.collection.title,
            position.index + 1,
            position.collection.size,
            position.file
        ),
        format!("{}Source: {}", indent(1), position.path.display()),
    ]
}

/// Scan problems, one per line, or a clean bill.
pub fn format_issues(report: &ScanReport) -> Vec<String> {
    if report.is_clean() {
        return vec![format!(
            "No issues ({} directories scanned)",
            report.directories
        )];
    }
    let mut lines = vec![format!(
        "{} issues ({} directories scanned)",
        report.issues.len(),
        report.directories
    )];
    lines.extend(
        report
            .issues
            .iter()
            .enumerate()
            .map(|(i, issue)| format!("{} {}", format_index(i + 1), issue)),
    );
    lines
}

pub fn format_view(view: &View<'_>) -> Vec<String> {
    match view {
        View::Statistics(stats) => format_statistics(stats),
        View::Grid(page) => format_grid(page),
        View::Browse(page) => format_browse(page),
        View::Detail(collection) => format_detail(collection),
        View::Image(position) => format_image(position),
    }
}

/// Write lines to stdout.
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_view(view: &View<'_>) {
    print_lines(&format_view(view));
}
