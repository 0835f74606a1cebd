//! Shared types for the LinkedIn post loader.
//!
//! Holds the raw and flattened post models, the error type, command-line
//! settings and text formatting helpers used by the other crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{PostsError, Result};
