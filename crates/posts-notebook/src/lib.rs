//! Notebook maintenance for the post analysis notebooks.
//!
//! Rewrites `.ipynb` files so that every plotly figure shown with
//! `fig.show()` is also exported as a static PNG, which keeps the charts
//! visible where notebooks are rendered without JavaScript.

pub mod patcher;

pub use patcher::{NotebookPatcher, PatchOutcome, PatchReport};
