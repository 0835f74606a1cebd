//! Data ingestion layer for LinkedIn post exports.
//!
//! Reads the exported JSON array, flattens each scraped post into a fixed
//! set of columns and assembles the rows into a [`table::PostTable`].

pub mod flatten;
pub mod loader;
pub mod pipeline;
pub mod table;

pub use posts_core as core;
