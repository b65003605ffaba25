//! Table Assembler (§4.5): Block + HeaderHierarchy + cleaner rewrites → one
//! row-oriented table plus its `TableMeta`.

use crate::types::block::Block;
use crate::types::grid::Grid;
use crate::types::header::HeaderHierarchy;
use crate::types::meta::{TableMeta, WarningCode};
use crate::types::score::TableScore;

/// An assembled table: its leaf column names and data rows, ready to hand
/// to an [`crate::collab::OutputSink`].
#[derive(Debug, Clone)]
pub struct AssembledTable {
    pub meta: TableMeta,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Slice the block's rectangle out of the raw grid, drop header rows and
/// any rows `mid_header_rows` (block-local indices) flagged, and build the
/// accompanying `TableMeta`.
#[must_use]
pub fn assemble_table(
    key: String,
    block: &Block,
    grid: &Grid,
    header: HeaderHierarchy,
    score: TableScore,
    is_main: bool,
    mid_header_rows: &[usize],
    units: Option<String>,
) -> AssembledTable {
    let dropped_absolute: std::collections::HashSet<usize> = header
        .header_rows
        .iter()
        .copied()
        .chain(mid_header_rows.iter().map(|&local| block.r0 + local))
        .collect();

    let mut rows = Vec::new();
    for r in block.r0..block.r1 {
        if dropped_absolute.contains(&r) {
            continue;
        }
        let row: Vec<String> = (block.c0..block.c1)
            .map(|c| grid.effective_value(r, c).trimmed_text())
            .collect();
        rows.push(row);
    }

    let columns = header.leaf_columns.clone();
    let mut warnings = Vec::new();
    if !mid_header_rows.is_empty() {
        warnings.push(WarningCode::MidHeadersRemoved);
    }
    if has_duplicate(&columns) {
        warnings.push(WarningCode::DuplicateColumns);
    }

    let meta = TableMeta {
        key,
        block_id: block.block_id.clone(),
        source: None,
        sheet: grid.sheet_name.clone(),
        bbox: (block.r0, block.r1, block.c0, block.c1),
        is_main,
        score,
        header,
        units,
        warnings,
    };

    AssembledTable { meta, columns, rows }
}

fn has_duplicate(names: &[String]) -> bool {
    let mut seen = std::collections::HashSet::new();
    names.iter().any(|n| !seen.insert(n.as_str()))
}
