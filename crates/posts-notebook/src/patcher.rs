use std::path::{Path, PathBuf};

use posts_core::{PostsError, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Call that marks a cell as displaying a figure.
const SHOW_CALL: &str = "fig.show()";

/// Present in every patched cell; cells containing it are left alone.
pub const PATCH_MARKER: &str = "pio.to_image";

/// Lines inserted after each `fig.show()` call.
pub const STATIC_IMAGE_BLOCK: [&str; 8] = [
    "# Display static image for GitHub preview\n",
    "from IPython.display import Image, display\n",
    "import plotly.io as pio\n",
    "try:\n",
    "    img_bytes = pio.to_image(fig, format='png', width=1200, height=700)\n",
    "    display(Image(img_bytes))\n",
    "except Exception as e:\n",
    "    print(f'Static image export requires kaleido: pip install kaleido')\n",
];

// ── Reports ───────────────────────────────────────────────────────────────────

/// What happened to one notebook file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file does not exist.
    Missing,
    /// Parsed, but no cell needed patching; the file was not rewritten.
    Unchanged { total_cells: usize },
    /// At least one cell was patched and the file was rewritten.
    Patched {
        total_cells: usize,
        modified_cells: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub path: PathBuf,
    pub outcome: PatchOutcome,
}

impl PatchReport {
    pub fn modified_cells(&self) -> usize {
        match self.outcome {
            PatchOutcome::Patched { modified_cells, .. } => modified_cells,
            _ => 0,
        }
    }
}

// ── NotebookPatcher ───────────────────────────────────────────────────────────

/// Inserts static image exports after plotly `fig.show()` calls.
pub struct NotebookPatcher {
    plotly: Regex,
}

impl Default for NotebookPatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl NotebookPatcher {
    pub fn new() -> Self {
        Self {
            plotly: Regex::new(r"(?i)plotly").expect("regex is valid"),
        }
    }

    /// Patch every notebook in `paths`, calling `on_report` after each one.
    ///
    /// Returns the total number of modified cells. Missing files are reported
    /// and skipped; any other failure stops the run.
    pub fn patch_all<F>(&self, paths: &[PathBuf], mut on_report: F) -> Result<usize>
    where
        F: FnMut(&PatchReport),
    {
        let mut total_modified = 0;
        for path in paths {
            let report = self.patch_file(path)?;
            total_modified += report.modified_cells();
            on_report(&report);
        }
        info!(
            "Modified {} cells across {} notebooks",
            total_modified,
            paths.len()
        );
        Ok(total_modified)
    }

    /// Patch one notebook file in place.
    ///
    /// The file is rewritten only when at least one cell changed. The write is
    /// a plain overwrite, not a rename.
    pub fn patch_file(&self, path: &Path) -> Result<PatchReport> {
        if !path.exists() {
            warn!("Skipping {} - not found", path.display());
            return Ok(PatchReport {
                path: path.to_path_buf(),
                outcome: PatchOutcome::Missing,
            });
        }

        info!("Processing {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|source| PostsError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut notebook: Value =
            serde_json::from_str(&content).map_err(|e| PostsError::MalformedNotebook {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let (total_cells, modified_cells) = self
            .patch_notebook(&mut notebook)
            .ok_or_else(|| PostsError::MalformedNotebook {
                path: path.to_path_buf(),
                reason: "no `cells` array at the notebook root".to_string(),
            })?;
        debug!(
            "{}: {} cells, {} modified",
            path.display(),
            total_cells,
            modified_cells
        );

        let outcome = if modified_cells > 0 {
            write_notebook(path, &notebook)?;
            PatchOutcome::Patched {
                total_cells,
                modified_cells,
            }
        } else {
            PatchOutcome::Unchanged { total_cells }
        };

        Ok(PatchReport {
            path: path.to_path_buf(),
            outcome,
        })
    }

    /// Patch the code cells of a parsed notebook.
    ///
    /// Returns `(total_cells, modified_cells)`, or `None` when the notebook
    /// has no `cells` array.
    pub fn patch_notebook(&self, notebook: &mut Value) -> Option<(usize, usize)> {
        let cells = notebook.get_mut("cells")?.as_array_mut()?;

        let mut modified = 0;
        for cell in cells.iter_mut() {
            let Some(cell) = cell.as_object_mut() else {
                continue;
            };
            if cell.get("cell_type").and_then(Value::as_str) != Some("code") {
                continue;
            }

            let Some(lines) = source_lines(cell.get("source")) else {
                warn!("Leaving a code cell with non-text source lines untouched");
                continue;
            };
            if let Some(patched) = self.patch_lines(&lines) {
                set_source(cell, patched);
                modified += 1;
            }
        }

        Some((cells.len(), modified))
    }

    /// Patch the source lines of one code cell.
    ///
    /// Returns `None` when the cell does not show a plotly figure or already
    /// carries the static export.
    pub fn patch_lines(&self, lines: &[String]) -> Option<Vec<String>> {
        let source = lines.concat();
        if !source.contains(SHOW_CALL) || !self.plotly.is_match(&source) {
            return None;
        }
        if source.contains(PATCH_MARKER) {
            return None;
        }

        let mut patched = Vec::with_capacity(lines.len() + STATIC_IMAGE_BLOCK.len());
        for line in lines {
            if !line.contains(SHOW_CALL) {
                patched.push(line.clone());
                continue;
            }

            let indent = &line[..line.len() - line.trim_start().len()];
            if line.ends_with('\n') {
                patched.push(line.clone());
            } else {
                patched.push(format!("{}\n", line));
            }
            patched.extend(
                STATIC_IMAGE_BLOCK
                    .iter()
                    .map(|block_line| format!("{}{}", indent, block_line)),
            );
        }

        (patched.len() > lines.len()).then_some(patched)
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// A cell's source as lines; nbformat allows a list of strings or one string.
///
/// `None` when the list holds anything other than strings, since writing such
/// a cell back would lose those items.
fn source_lines(source: Option<&Value>) -> Option<Vec<String>> {
    match source {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(s)) => Some(s.split_inclusive('\n').map(str::to_string).collect()),
        _ => Some(Vec::new()),
    }
}

fn set_source(cell: &mut Map<String, Value>, lines: Vec<String>) {
    let lines = lines.into_iter().map(Value::String).collect();
    cell.insert("source".to_string(), Value::Array(lines));
}

/// Serialize with a one-space indent, keeping non-ASCII text as-is.
fn write_notebook(path: &Path, notebook: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    notebook.serialize(&mut serializer)?;

    std::fs::write(path, buf).map_err(|source| PostsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn plotly_cell() -> Value {
        json!({
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [],
            "source": [
                "import plotly.express as px\n",
                "fig = px.bar(df, x='type', y='numLikes', title='Likes – by type')\n",
                "fig.show()"
            ]
        })
    }

    fn notebook(cells: Vec<Value>) -> Value {
        json!({
            "cells": cells,
            "metadata": {"kernelspec": {"name": "python3"}},
            "nbformat": 4,
            "nbformat_minor": 5
        })
    }

    fn write_notebook_file(dir: &Path, name: &str, nb: &Value) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, serde_json::to_string_pretty(nb).unwrap()).unwrap();
        path
    }

    // ── patch_lines ───────────────────────────────────────────────────────────

    #[test]
    fn test_patch_lines_inserts_block_after_show() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import plotly.express as px\n", "fig.show()\n", "print('done')\n"]);

        let patched = patcher.patch_lines(&src).unwrap();

        assert_eq!(patched.len(), src.len() + STATIC_IMAGE_BLOCK.len());
        assert_eq!(patched[1], "fig.show()\n");
        assert_eq!(patched[2], STATIC_IMAGE_BLOCK[0]);
        assert_eq!(patched[9], STATIC_IMAGE_BLOCK[7]);
        assert_eq!(patched[10], "print('done')\n");
    }

    #[test]
    fn test_patch_lines_plotly_match_is_case_insensitive() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["# Plotly chart\n", "fig.show()\n"]);
        assert!(patcher.patch_lines(&src).is_some());
    }

    #[test]
    fn test_patch_lines_requires_plotly_mention() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import matplotlib.pyplot as plt\n", "fig.show()\n"]);
        assert!(patcher.patch_lines(&src).is_none());
    }

    #[test]
    fn test_patch_lines_requires_show_call() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import plotly.express as px\n", "fig = px.line(df)\n"]);
        assert!(patcher.patch_lines(&src).is_none());
    }

    #[test]
    fn test_patch_lines_skips_already_patched() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import plotly.express as px\n", "fig.show()\n"]);
        let once = patcher.patch_lines(&src).unwrap();
        assert!(patcher.patch_lines(&once).is_none());
    }

    #[test]
    fn test_patch_lines_terminates_last_line_and_keeps_indent() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import plotly.io\n", "for fig in figs:\n", "    fig.show()"]);

        let patched = patcher.patch_lines(&src).unwrap();

        assert_eq!(patched[2], "    fig.show()\n");
        assert_eq!(patched[3], "    # Display static image for GitHub preview\n");
        assert_eq!(patched[6], "    try:\n");
        assert_eq!(
            patched[7],
            "        img_bytes = pio.to_image(fig, format='png', width=1200, height=700)\n"
        );
    }

    #[test]
    fn test_patch_lines_every_show_call() {
        let patcher = NotebookPatcher::new();
        let src = lines(&["import plotly\n", "fig.show()\n", "fig = other()\n", "fig.show()\n"]);
        let patched = patcher.patch_lines(&src).unwrap();
        assert_eq!(patched.len(), src.len() + 2 * STATIC_IMAGE_BLOCK.len());
    }

    // ── patch_notebook ────────────────────────────────────────────────────────

    #[test]
    fn test_patch_notebook_counts_cells() {
        let patcher = NotebookPatcher::new();
        let mut nb = notebook(vec![
            json!({"cell_type": "markdown", "metadata": {}, "source": ["fig.show() with plotly"]}),
            plotly_cell(),
            json!({"cell_type": "code", "metadata": {}, "outputs": [], "source": ["df.head()"]}),
        ]);

        let (total, modified) = patcher.patch_notebook(&mut nb).unwrap();

        assert_eq!(total, 3);
        assert_eq!(modified, 1);
        let source = nb["cells"][1]["source"].as_array().unwrap();
        assert_eq!(source.len(), 3 + STATIC_IMAGE_BLOCK.len());
        assert_eq!(nb["cells"][0]["source"], json!(["fig.show() with plotly"]));
    }

    #[test]
    fn test_patch_notebook_string_source() {
        let patcher = NotebookPatcher::new();
        let mut nb = notebook(vec![json!({
            "cell_type": "code",
            "metadata": {},
            "outputs": [],
            "source": "import plotly.express as px\nfig.show()\n"
        })]);

        let (_, modified) = patcher.patch_notebook(&mut nb).unwrap();

        assert_eq!(modified, 1);
        let source = nb["cells"][0]["source"].as_array().unwrap();
        assert_eq!(source[0], json!("import plotly.express as px\n"));
        assert_eq!(source[1], json!("fig.show()\n"));
        assert_eq!(source.len(), 2 + STATIC_IMAGE_BLOCK.len());
    }

    #[test]
    fn test_patch_notebook_leaves_non_text_source_untouched() {
        let patcher = NotebookPatcher::new();
        let source = json!(["import plotly\n", 42, "fig.show()\n"]);
        let mut nb = notebook(vec![json!({
            "cell_type": "code",
            "metadata": {},
            "outputs": [],
            "source": source.clone()
        })]);

        let (total, modified) = patcher.patch_notebook(&mut nb).unwrap();

        assert_eq!(total, 1);
        assert_eq!(modified, 0);
        assert_eq!(nb["cells"][0]["source"], source);
    }

    #[test]
    fn test_patch_notebook_without_cells() {
        let patcher = NotebookPatcher::new();
        assert!(patcher.patch_notebook(&mut json!({"nbformat": 4})).is_none());
        assert!(patcher.patch_notebook(&mut json!([])).is_none());
    }

    // ── patch_file ────────────────────────────────────────────────────────────

    #[test]
    fn test_patch_file_missing_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.ipynb");

        let report = NotebookPatcher::new().patch_file(&path).unwrap();

        assert_eq!(report.outcome, PatchOutcome::Missing);
        assert!(!path.exists());
    }

    #[test]
    fn test_patch_file_writes_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_notebook_file(dir.path(), "chart.ipynb", &notebook(vec![plotly_cell()]));
        let patcher = NotebookPatcher::new();

        let first = patcher.patch_file(&path).unwrap();
        assert_eq!(
            first.outcome,
            PatchOutcome::Patched {
                total_cells: 1,
                modified_cells: 1
            }
        );
        let after_first = std::fs::read_to_string(&path).unwrap();
        assert!(after_first.contains(PATCH_MARKER));
        // Non-ASCII text is written unescaped.
        assert!(after_first.contains("Likes – by type"));
        // One-space indentation, keys in insertion order.
        assert!(after_first.starts_with("{\n \"cells\": ["));

        let second = patcher.patch_file(&path).unwrap();
        assert_eq!(second.outcome, PatchOutcome::Unchanged { total_cells: 1 });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), after_first);
    }

    #[test]
    fn test_patch_file_unchanged_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let nb = notebook(vec![json!({"cell_type": "code", "metadata": {}, "source": ["1 + 1"]})]);
        let path = write_notebook_file(dir.path(), "plain.ipynb", &nb);
        let before = std::fs::read_to_string(&path).unwrap();

        let report = NotebookPatcher::new().patch_file(&path).unwrap();

        assert_eq!(report.outcome, PatchOutcome::Unchanged { total_cells: 1 });
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_patch_file_malformed_notebook() {
        let dir = TempDir::new().unwrap();
        let path = write_notebook_file(dir.path(), "odd.ipynb", &json!({"worksheets": []}));

        let err = NotebookPatcher::new().patch_file(&path).unwrap_err();
        assert!(matches!(err, PostsError::MalformedNotebook { .. }));
    }

    #[test]
    fn test_patch_file_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ipynb");
        std::fs::write(&path, "{\"cells\": [").unwrap();

        let err = NotebookPatcher::new().patch_file(&path).unwrap_err();
        assert!(matches!(err, PostsError::MalformedNotebook { .. }));
        assert!(err.to_string().contains("broken.ipynb"));
    }

    #[test]
    fn test_patch_all_stops_at_unparsable_notebook() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("01.ipynb");
        std::fs::write(&broken, "not json").unwrap();
        let later = write_notebook_file(dir.path(), "02.ipynb", &notebook(vec![plotly_cell()]));
        let before = std::fs::read_to_string(&later).unwrap();

        let mut reports = Vec::new();
        let err = NotebookPatcher::new()
            .patch_all(&[broken, later.clone()], |r| reports.push(r.clone()))
            .unwrap_err();

        assert!(err.to_string().contains("01.ipynb"));
        assert!(reports.is_empty());
        assert_eq!(std::fs::read_to_string(&later).unwrap(), before);
    }

    // ── patch_all ─────────────────────────────────────────────────────────────

    #[test]
    fn test_patch_all_reports_each_file() {
        let dir = TempDir::new().unwrap();
        let patched = write_notebook_file(
            dir.path(),
            "01.ipynb",
            &notebook(vec![plotly_cell(), plotly_cell()]),
        );
        let missing = dir.path().join("02.ipynb");
        let paths = vec![patched.clone(), missing.clone()];

        let mut reports = Vec::new();
        let total = NotebookPatcher::new()
            .patch_all(&paths, |r| reports.push(r.clone()))
            .unwrap();

        assert_eq!(total, 2);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].path, patched);
        assert_eq!(reports[0].modified_cells(), 2);
        assert_eq!(reports[1].path, missing);
        assert_eq!(reports[1].outcome, PatchOutcome::Missing);
    }
}
