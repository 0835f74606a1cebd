use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Location of the sample export used when no dataset path is given.
pub const DEFAULT_DATASET_PATH: &str = "../dataset_linkedin-post_2025-11-23_06-22-48-536.json";

/// Notebooks patched when `patch-notebooks` is run without explicit paths.
pub const DEFAULT_NOTEBOOKS: [&str; 5] = [
    "notebooks/01_data_cleaning.ipynb",
    "notebooks/02_exploratory_analysis.ipynb",
    "notebooks/03_statistical_analysis.ipynb",
    "notebooks/04_content_analysis.ipynb",
    "notebooks/07_final_report.ipynb",
];

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Load LinkedIn post exports and prepare analysis notebooks
#[derive(Parser, Debug, Clone)]
#[command(
    name = "linkedin-posts",
    about = "Load LinkedIn post exports and prepare analysis notebooks",
    version
)]
pub struct Settings {
    /// Logging level
    #[arg(
        long,
        global = true,
        default_value = "INFO",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What the binary should do.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load an export and print its shape, columns, first rows and column types
    Inspect {
        /// Path to the exported JSON array of posts
        #[arg(env = "LINKEDIN_POSTS_DATASET", default_value = DEFAULT_DATASET_PATH)]
        path: PathBuf,

        /// Number of rows to preview
        #[arg(long, default_value = "5")]
        head: usize,

        /// Also write the flattened rows as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Add static image fallbacks after plotly `fig.show()` calls in notebooks
    PatchNotebooks {
        /// Notebook files to patch (defaults to the analysis notebooks)
        paths: Vec<PathBuf>,
    },
}

impl Settings {
    /// Effective log level after applying `--debug`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "DEBUG"
        } else {
            &self.log_level
        }
    }
}

impl Command {
    /// Notebook paths to patch, falling back to [`DEFAULT_NOTEBOOKS`].
    ///
    /// Returns an empty list for commands other than `patch-notebooks`.
    pub fn notebook_paths(&self) -> Vec<PathBuf> {
        match self {
            Command::PatchNotebooks { paths } if paths.is_empty() => {
                DEFAULT_NOTEBOOKS.iter().map(PathBuf::from).collect()
            }
            Command::PatchNotebooks { paths } => paths.clone(),
            Command::Inspect { .. } => Vec::new(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
