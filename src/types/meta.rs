//! Per-table metadata and the warning taxonomy (§3 "TableMeta", §7).

use serde::{Deserialize, Serialize};

use super::header::HeaderHierarchy;
use super::score::TableScore;

/// Non-fatal conditions surfaced in metadata and manifest counts.
///
/// Never propagated as an error — see spec.md §7 "Warning-class conditions
/// never abort; they are logged and attached to the affected `TableMeta`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WarningCode {
    MidHeadersRemoved,
    DateParseFallback,
    UnitConflict,
    DuplicateColumns,
    SparseBlockSkipped,
    AmbiguousMergeSkip,
}

/// The bbox, score, header hierarchy, and bookkeeping for one emitted table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMeta {
    /// Stable key assigned in global block-discovery order across all
    /// sheets in the run (`df1`, `df2`, …) — spec.md §4.5.
    pub key: String,
    pub block_id: String,
    pub source: Option<String>,
    pub sheet: Option<String>,
    pub bbox: (usize, usize, usize, usize),
    pub is_main: bool,
    pub score: TableScore,
    #[serde(skip)]
    pub header: HeaderHierarchy,
    pub units: Option<String>,
    pub warnings: Vec<WarningCode>,
}

impl TableMeta {
    pub fn push_warning(&mut self, code: WarningCode) {
        if !self.warnings.contains(&code) {
            self.warnings.push(code);
        }
    }
}

/// One row in the run manifest's output list (§6 "Manifest").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputItem {
    pub key: String,
    pub name: String,
    pub path: Option<String>,
    pub rows: usize,
    pub cols: usize,
}
