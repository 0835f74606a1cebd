//! In-memory table of flattened posts.
//!
//! Rows are [`FlatPost`]s in input order; the column set is the fixed
//! [`COLUMNS`] list, so every row carries every column.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use posts_core::models::{FlatPost, COLUMNS};
use posts_core::{PostsError, Result};
use serde_json::Value;
use tracing::info;

use crate::flatten::flatten_post;

// ── ColumnType ────────────────────────────────────────────────────────────────

/// Type inferred for a column from the values it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    String,
    /// Nested JSON objects or arrays.
    Object,
    /// Non-null values of more than one type.
    Mixed,
    /// Every value is absent.
    Null,
}

impl ColumnType {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(_) => Some(Self::Bool),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(Self::Int),
            Value::Number(_) => Some(Self::Float),
            Value::String(_) => Some(Self::String),
            Value::Array(_) | Value::Object(_) => Some(Self::Object),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Object => "object",
            Self::Mixed => "mixed",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

// ── PostTable ─────────────────────────────────────────────────────────────────

/// Flattened posts, one row per input record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostTable {
    rows: Vec<FlatPost>,
}

impl PostTable {
    /// Flatten every raw record, preserving input order.
    pub fn from_posts(posts: &[Value]) -> Self {
        info!("Converting posts to table");

        let rows: Vec<FlatPost> = posts.iter().map(flatten_post).collect();
        let table = Self { rows };

        let (rows, columns) = table.shape();
        info!("Created table with {} rows and {} columns", rows, columns);
        table
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), COLUMNS.len())
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[FlatPost] {
        &self.rows
    }

    /// The first `n` rows, or every row when the table is shorter.
    pub fn head(&self, n: usize) -> &[FlatPost] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Every row's value for `name`, or `None` for an unknown column.
    pub fn column(&self, name: &str) -> Option<Vec<Value>> {
        if !COLUMNS.contains(&name) {
            return None;
        }
        Some(
            self.rows
                .iter()
                .map(|row| row.to_record().get(name).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }

    /// Inferred type of every column, in column order.
    pub fn dtypes(&self) -> Vec<(&'static str, ColumnType)> {
        let records = self.to_records();
        COLUMNS
            .iter()
            .map(|&name| {
                let mut inferred: Option<ColumnType> = None;
                for record in &records {
                    let Some(ty) = record.get(name).and_then(ColumnType::of) else {
                        continue;
                    };
                    inferred = match inferred {
                        None => Some(ty),
                        Some(prev) if prev == ty => Some(prev),
                        Some(ColumnType::Int) if ty == ColumnType::Float => Some(ty),
                        Some(ColumnType::Float) if ty == ColumnType::Int => Some(ColumnType::Float),
                        Some(_) => Some(ColumnType::Mixed),
                    };
                }
                (name, inferred.unwrap_or(ColumnType::Null))
            })
            .collect()
    }

    /// Earliest and latest publication time across rows that carry one.
    pub fn posted_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let mut times = self.rows.iter().filter_map(FlatPost::posted_at);
        let first = times.next()?;
        Some(times.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t))))
    }

    /// All rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<serde_json::Map<String, Value>> {
        self.rows.iter().map(FlatPost::to_record).collect()
    }

    /// Write the rows to `path` as a pretty-printed JSON array of objects.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.rows)?;
        std::fs::write(path, json).map_err(|source| PostsError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Wrote {} rows to {}", self.rows.len(), path.display());
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
