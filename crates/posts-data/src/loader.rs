//! Reading LinkedIn post exports from disk.
//!
//! An export is a single JSON document whose root is an array of post objects.
//! The loader only validates that shape; record contents are left untouched
//! for the flattener.

use std::path::Path;

use posts_core::{PostsError, Result};
use serde_json::Value;
use tracing::info;

/// Load the raw post values from the export at `path`.
///
/// Fails with [`PostsError::FileNotFound`] when `path` does not exist and with
/// [`PostsError::NotAnArray`] when the parsed JSON root is not an array.
pub fn load_posts(path: &Path) -> Result<Vec<Value>> {
    info!("Loading data from {}", path.display());

    if !path.exists() {
        return Err(PostsError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| PostsError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let data: Value = serde_json::from_str(&content)?;
    let Value::Array(posts) = data else {
        return Err(PostsError::NotAnArray(path.to_path_buf()));
    };

    info!("Loaded {} posts", posts.len());
    Ok(posts)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
