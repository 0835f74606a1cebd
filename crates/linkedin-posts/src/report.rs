//! Plain-text reports printed to stdout by the binary.

use chrono::{DateTime, Utc};
use posts_core::formatting::{format_cell, format_count, pad_to_width, truncate_to_width};
use posts_data::table::PostTable;
use posts_notebook::{PatchOutcome, PatchReport};
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

/// Columns shown in the row preview; the full set is too wide for a terminal.
const PREVIEW_COLUMNS: [&str; 8] = [
    "urn",
    "type",
    "postedAtISO",
    "numLikes",
    "numComments",
    "numShares",
    "author_fullName",
    "text",
];

/// Widest a preview cell may get before it is truncated.
const MAX_CELL_WIDTH: usize = 28;

const RULE_WIDTH: usize = 70;

// ── Inspection ────────────────────────────────────────────────────────────────

/// Shape, columns, row preview, column types and date range of `table`.
pub fn render_inspection(table: &PostTable, head: usize) -> String {
    let (rows, columns) = table.shape();
    let mut out = vec![
        format!("Table shape: ({}, {})", rows, columns),
        String::new(),
        format!("Columns: [{}]", table.columns().join(", ")),
        String::new(),
        "First few rows:".to_string(),
    ];
    out.extend(render_preview(table, head));

    out.push(String::new());
    out.push("Data types:".to_string());
    let name_width = table.columns().iter().map(|c| c.width()).max().unwrap_or(0);
    for (name, ty) in table.dtypes() {
        out.push(format!("{}  {}", pad_to_width(name, name_width), ty));
    }

    out.push(String::new());
    match table.posted_range() {
        Some((earliest, latest)) => out.push(format!(
            "Posted between {} and {}",
            format_timestamp(&earliest),
            format_timestamp(&latest)
        )),
        None => out.push("No publication dates found".to_string()),
    }

    let total_likes = table
        .rows()
        .iter()
        .fold(0i64, |acc, r| acc.saturating_add(r.num_likes));
    out.push(format!(
        "Total likes across {} posts: {}",
        format_count(rows as i64),
        format_count(total_likes)
    ));

    out.join("\n") + "\n"
}

/// The first `head` rows restricted to [`PREVIEW_COLUMNS`], as aligned text.
fn render_preview(table: &PostTable, head: usize) -> Vec<String> {
    let rows = table.head(head);
    if rows.is_empty() {
        return vec!["(empty table)".to_string()];
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let record = row.to_record();
            let mut line = vec![index.to_string()];
            line.extend(PREVIEW_COLUMNS.iter().map(|&column| {
                let value = record.get(column).unwrap_or(&Value::Null);
                truncate_to_width(&format_cell(value), MAX_CELL_WIDTH)
            }));
            line
        })
        .collect();

    let mut header = vec![String::new()];
    header.extend(PREVIEW_COLUMNS.iter().map(|c| c.to_string()));

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            std::iter::once(&header)
                .chain(cells.iter())
                .map(|line| line[i].width())
                .max()
                .unwrap_or(0)
        })
        .collect();

    std::iter::once(&header)
        .chain(cells.iter())
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(cell, &width)| pad_to_width(cell, width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

// ── Notebook patching ─────────────────────────────────────────────────────────

/// Progress lines for one patched notebook.
pub fn render_patch_report(report: &PatchReport) -> Vec<String> {
    let path = report.path.display();
    match report.outcome {
        PatchOutcome::Missing => vec![format!("Skipping {} - not found", path)],
        PatchOutcome::Unchanged { total_cells } => vec![
            format!("\nProcessing {}...", path),
            format!("  Total cells: {}", total_cells),
            "  No cells modified (already updated or no visualizations)".to_string(),
        ],
        PatchOutcome::Patched {
            total_cells,
            modified_cells,
        } => vec![
            format!("\nProcessing {}...", path),
            format!("  Total cells: {}", total_cells),
            format!("  Modified {} cells", modified_cells),
        ],
    }
}

/// Closing summary with the follow-up steps for rendering the images.
pub fn render_patch_summary(total_modified: usize) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    [
        String::new(),
        rule.clone(),
        format!("SUMMARY: Modified {} cells across all notebooks", total_modified),
        rule,
        String::new(),
        "Next steps:".to_string(),
        "1. Install kaleido: pip install kaleido".to_string(),
        "2. Re-run all visualization cells in the notebooks".to_string(),
        "3. The static images will be embedded in the notebook outputs".to_string(),
        "4. GitHub will display these images in the notebook preview".to_string(),
    ]
    .join("\n")
        + "\n"
}

// ── Tests ─────────────────────────────────────────────────────────────────────
