//! Multi-level header reconstruction (§3 "HeaderHierarchy").

use std::collections::HashMap;

/// Header rows, per-cell title paths, and the final leaf column names for
/// one Block.
#[derive(Debug, Clone, Default)]
pub struct HeaderHierarchy {
    /// Absolute row indices (within the sheet) that were classified as
    /// header rows, in ascending order.
    pub header_rows: Vec<usize>,
    /// `(r, c)` within the header band → ordered, deduplicated title path
    /// observed at that cell.
    pub title_paths: HashMap<(usize, usize), Vec<String>>,
    /// One leaf name per column in the block's column range, in column
    /// order.
    pub leaf_columns: Vec<String>,
}

impl HeaderHierarchy {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header_rows.is_empty()
    }
}
