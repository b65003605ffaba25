//! Per-block scoring (§3 "TableScore", §4.4).

use serde::{Deserialize, Serialize};

/// Weighted quality score for a candidate Block.
///
/// `total` is always recomputed from the fixed weights in spec.md §3 —
/// constructing one directly (e.g. in tests) should go through
/// [`TableScore::compute`] rather than hand-filling `total`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TableScore {
    pub area: usize,
    pub density: f64,
    pub type_consistency: f64,
    pub border_completeness: f64,
    pub header_completeness: f64,
    pub total: f64,
}

impl TableScore {
    #[must_use]
    pub fn compute(
        area: usize,
        density: f64,
        type_consistency: f64,
        border_completeness: f64,
        header_completeness: f64,
    ) -> Self {
        let total = 0.30 * density
            + 0.25 * type_consistency
            + 0.20 * border_completeness
            + 0.25 * header_completeness;
        Self {
            area,
            density,
            type_consistency,
            border_completeness,
            header_completeness,
            total,
        }
    }
}
