//! Cleaner / Scorer (§4.4): per-block scoring, main-table selection, merge
//! gain, mid-header removal, unit-line extraction.

use regex::Regex;

use crate::types::block::Block;
use crate::types::grid::Grid;
use crate::types::header::HeaderHierarchy;
use crate::types::matrices::{CellType, DerivedMatrices};
use crate::types::score::TableScore;

/// Compute a Block's `TableScore` (§3, §4.4 "Per-block scoring").
#[must_use]
pub fn score_block(block: &Block, matrices: &DerivedMatrices, header: &HeaderHierarchy) -> TableScore {
    let area = block.area();
    let density = block_density(block, matrices);
    let type_consistency = column_type_consistency(block, matrices);
    let border_completeness = block_border_completeness(block, matrices);
    let header_completeness = if header.header_rows.is_empty() {
        0.0
    } else {
        let inside = header
            .header_rows
            .iter()
            .filter(|&&r| r >= block.r0 && r < block.r1)
            .count();
        inside as f64 / header.header_rows.len() as f64
    };
    TableScore::compute(
        area,
        density,
        type_consistency,
        border_completeness,
        header_completeness,
    )
}

fn block_density(block: &Block, matrices: &DerivedMatrices) -> f64 {
    let area = block.area();
    if area == 0 {
        return 0.0;
    }
    let mut occupied = 0usize;
    for r in block.r0..block.r1 {
        for c in block.c0..block.c1 {
            if matrices.occupied(r, c) {
                occupied += 1;
            }
        }
    }
    occupied as f64 / area as f64
}

/// Average, across columns, of the share held by that column's most
/// frequent non-empty type.
fn column_type_consistency(block: &Block, matrices: &DerivedMatrices) -> f64 {
    if block.width() == 0 {
        return 0.0;
    }
    let mut total = 0.0;
    for c in block.c0..block.c1 {
        let mut counts = [0usize; 3]; // Text, Numeric, DateLike
        let mut non_empty = 0usize;
        for r in block.r0..block.r1 {
            match matrices.cell_type(r, c) {
                CellType::Text => {
                    counts[0] += 1;
                    non_empty += 1;
                }
                CellType::Numeric => {
                    counts[1] += 1;
                    non_empty += 1;
                }
                CellType::DateLike => {
                    counts[2] += 1;
                    non_empty += 1;
                }
                CellType::Empty => {}
            }
        }
        if non_empty > 0 {
            let modal = *counts.iter().max().unwrap();
            total += modal as f64 / non_empty as f64;
        }
    }
    total / block.width() as f64
}

fn block_border_completeness(block: &Block, matrices: &DerivedMatrices) -> f64 {
    if !matrices.has_borders() {
        return 0.5;
    }
    let (h, w) = (block.height(), block.width());
    if h == 0 || w == 0 {
        return 0.5;
    }
    let perimeter_cells = if h == 1 || w == 1 { h * w } else { 2 * (h + w) - 4 };
    if perimeter_cells == 0 {
        return 0.5;
    }
    let mut set = 0usize;
    for c in block.c0..block.c1 {
        if matrices.border(block.r0, c).is_some_and(|f| f.top) {
            set += 1;
        }
        if matrices.border(block.r1 - 1, c).is_some_and(|f| f.bottom) {
            set += 1;
        }
    }
    for r in block.r0..block.r1 {
        if matrices.border(r, block.c0).is_some_and(|f| f.left) {
            set += 1;
        }
        if matrices.border(r, block.c1 - 1).is_some_and(|f| f.right) {
            set += 1;
        }
    }
    set as f64 / (4.0 * perimeter_cells as f64)
}

/// Index of the block with the greatest total score. Ties favor the
/// earliest block in discovery order (§4.4 "Main-table selection").
#[must_use]
pub fn select_main_table(scores: &[TableScore]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, score) in scores.iter().enumerate() {
        match best {
            Some((_, best_total)) if score.total <= best_total => {}
            _ => best = Some((i, score.total)),
        }
    }
    best.map(|(i, _)| i)
}

/// Pairwise merge gain between two blocks (§4.4 "Optional pairwise merge").
/// Returns `None` when the blocks are neither row- nor column-adjacent with
/// matching extents on the other axis.
#[must_use]
pub fn merge_gain(a: &Block, b: &Block, matrices: &DerivedMatrices) -> Option<f64> {
    let alignment = if a.r0 == b.r0 && a.r1 == b.r1 && axis_adjacent(a.c0, a.c1, b.c0, b.c1) {
        1.0
    } else if a.c0 == b.c0 && a.c1 == b.c1 && axis_adjacent(a.r0, a.r1, b.r0, b.r1) {
        0.8
    } else {
        0.0
    };
    if alignment == 0.0 {
        return None;
    }

    let type_consistency = overlapping_type_consistency(a, b, matrices);

    let merged = a.union(b);
    let merged_density = block_density(&merged, matrices);
    let lower_source_density = block_density(a, matrices).min(block_density(b, matrices));
    let density_change = (merged_density - lower_source_density).max(0.0);

    let row_gap = a.r0.max(b.r0).saturating_sub(a.r1.min(b.r1));
    let col_gap = a.c0.max(b.c0).saturating_sub(a.c1.min(b.c1));
    let penalty = (row_gap.max(col_gap) as f64 / 10.0).min(1.0);

    Some(0.4 * alignment + 0.3 * type_consistency + 0.2 * density_change - 0.1 * penalty)
}

fn axis_adjacent(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> bool {
    a_end == b_start || b_end == a_start
}

fn overlapping_type_consistency(a: &Block, b: &Block, matrices: &DerivedMatrices) -> f64 {
    let c0 = a.c0.max(b.c0);
    let c1 = a.c1.min(b.c1);
    if c1 <= c0 {
        return 0.0;
    }
    let mut matches = 0usize;
    let width = c1 - c0;
    for c in c0..c1 {
        if dominant_type(a, c, matrices) == dominant_type(b, c, matrices) {
            matches += 1;
        }
    }
    matches as f64 / width as f64
}

fn dominant_type(block: &Block, c: usize, matrices: &DerivedMatrices) -> CellType {
    let mut counts = [0usize; 4];
    for r in block.r0..block.r1 {
        match matrices.cell_type(r, c) {
            CellType::Empty => counts[0] += 1,
            CellType::Text => counts[1] += 1,
            CellType::Numeric => counts[2] += 1,
            CellType::DateLike => counts[3] += 1,
        }
    }
    let max_idx = counts
        .iter()
        .enumerate()
        .max_by_key(|&(_, n)| n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    match max_idx {
        1 => CellType::Text,
        2 => CellType::Numeric,
        3 => CellType::DateLike,
        _ => CellType::Empty,
    }
}

/// Local row indices (relative to the block) dropped as repeated
/// mid-stream headers (§4.4 "Mid-header removal").
///
/// Does not re-check against header rows beyond the first — matching the
/// source behavior documented in spec.md §9 open question (b).
#[must_use]
pub fn find_mid_header_rows(block: &Block, grid: &Grid, header: &HeaderHierarchy) -> Vec<usize> {
    let Some(&first_header_row) = header.header_rows.first() else {
        return Vec::new();
    };
    let Some(&last_header_row) = header.header_rows.last() else {
        return Vec::new();
    };

    let signature_width = block.width().min(5);
    let signature: Vec<String> = (block.c0..block.c0 + signature_width)
        .map(|c| grid.effective_value(first_header_row, c).trimmed_text())
        .collect();
    if signature.iter().all(String::is_empty) {
        return Vec::new();
    }

    let mut dropped = Vec::new();
    for r in (last_header_row + 1)..block.r1 {
        let mut non_empty = 0usize;
        let mut matched = 0usize;
        for (i, c) in (block.c0..block.c0 + signature_width).enumerate() {
            let text = grid.effective_value(r, c).trimmed_text();
            if text.is_empty() {
                continue;
            }
            non_empty += 1;
            if text == signature[i] {
                matched += 1;
            }
        }
        if non_empty > 0 && matched as f64 / non_empty as f64 >= 0.7 {
            dropped.push(r - block.r0);
        }
    }
    if !dropped.is_empty() {
        log::warn!(
            "clean.mid_headers_removed block_id={} rows={}",
            block.block_id,
            dropped.len()
        );
    }
    dropped
}

/// First regex match's trimmed cell text, scanning the first 10 rows and
/// first 5 columns of the block (§4.4 "Unit-line extraction").
#[must_use]
pub fn extract_unit_line(block: &Block, grid: &Grid, patterns: &[Regex]) -> Option<String> {
    let row_scan = block.r0 + block.height().min(10);
    let col_scan = block.c0 + block.width().min(5);
    for r in block.r0..row_scan {
        for c in block.c0..col_scan {
            let text = grid.effective_value(r, c).trimmed_text();
            if text.is_empty() {
                continue;
            }
            if patterns.iter().any(|re| re.is_match(&text)) {
                return Some(text);
            }
        }
    }
    None
}
