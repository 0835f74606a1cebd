//! End-to-end loading: export file in, [`PostTable`] out.

use std::path::Path;

use posts_core::Result;

use crate::loader::load_posts;
use crate::table::PostTable;

/// Load the export at `path` and flatten it into a [`PostTable`].
///
/// Errors are the loader's; flattening itself never fails.
pub fn load_and_prepare(path: &Path) -> Result<PostTable> {
    let posts = load_posts(path)?;
    Ok(PostTable::from_posts(&posts))
}
