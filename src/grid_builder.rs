//! Grid Builder (§4.1): Grid + aux maps → `O`, `B`, `S`, `T`.

use crate::config::PipelineConfig;
use crate::types::grid::CellValue;
use crate::types::matrices::{CellType, DerivedMatrices};
use crate::types::grid::Grid;

/// Characters that, combined with a minimum length, flag a string as
/// date-like. Checked *before* the generic text fallback but *after* the
/// numeric check — spec.md §3/§9 calls this ordering out explicitly and
/// requires it be reproduced verbatim.
const DATE_LIKE_MARKERS: [char; 6] = ['-', '/', ':', 'T', '年', '月'];
const DATE_LIKE_EXTRA_MARKER: char = '日';

const STYLE_BOLD_WEIGHT: f32 = 0.5;
const STYLE_FILL_WEIGHT: f32 = 0.3;
const TEXT_RATIO_BONUS_WEIGHT: f32 = 0.2;
const TEXT_RATIO_BONUS_ROWS: usize = 10;

/// Build the four derived matrices for one sheet's Grid.
///
/// Hidden rows/columns are zeroed in `O` unless `config.include_hidden` is
/// set, per spec.md §4.1 and invariant "`O[r,c] = 0` for every `(r,c)` with
/// `r ∈ hidden_rows ∨ c ∈ hidden_cols`."
#[must_use]
pub fn build_matrices(grid: &Grid, config: &PipelineConfig) -> DerivedMatrices {
    let has_borders = grid.borders.is_some();
    let mut matrices = DerivedMatrices::new(grid.rows, grid.cols, has_borders);

    for r in 0..grid.rows {
        for c in 0..grid.cols {
            let value = grid.value(r, c);
            let occupied = !value.is_blank();
            matrices.set_occupied(r, c, occupied);
            matrices.set_cell_type(r, c, classify_cell(value));

            if let Some(flags) = grid.border(r, c) {
                matrices.set_border(r, c, flags);
            }
            if let Some(style) = grid.style(r, c) {
                let mut strength = 0.0f32;
                if style.bold {
                    strength += STYLE_BOLD_WEIGHT;
                }
                if style.fill {
                    strength += STYLE_FILL_WEIGHT;
                }
                matrices.add_style(r, c, strength);
            }
        }
    }

    if grid.styles.is_none() {
        apply_text_ratio_fallback(grid, &mut matrices);
    }

    if !config.include_hidden {
        zero_hidden(grid, &mut matrices);
    }

    matrices
}

/// empty → numeric → date-like → text, in that exact order (§3, §9).
fn classify_cell(value: &CellValue) -> CellType {
    if value.is_blank() {
        return CellType::Empty;
    }
    let text = value.trimmed_text();
    if matches!(value, CellValue::Number(_)) || is_numeric(&text) {
        return CellType::Numeric;
    }
    if is_date_like(&text) {
        return CellType::DateLike;
    }
    CellType::Text
}

fn is_numeric(s: &str) -> bool {
    let cleaned: String = s
        .chars()
        .filter(|ch| !matches!(ch, ',' | '%' | '¥' | '$' | '€' | '£'))
        .collect();
    !cleaned.trim().is_empty() && cleaned.trim().parse::<f64>().is_ok()
}

fn is_date_like(s: &str) -> bool {
    if s.chars().count() < 6 {
        return false;
    }
    s.chars()
        .any(|ch| DATE_LIKE_MARKERS.contains(&ch) || ch == DATE_LIKE_EXTRA_MARKER)
}

/// Bonus of up to 0.2, scaled by a row's text-to-total ratio, added to the
/// top 10 rows when the source format carries no style info (§3).
fn apply_text_ratio_fallback(grid: &Grid, matrices: &mut DerivedMatrices) {
    let scan_rows = grid.rows.min(TEXT_RATIO_BONUS_ROWS);
    for r in 0..scan_rows {
        let mut text_count = 0usize;
        for c in 0..grid.cols {
            let value = grid.value(r, c);
            if !value.is_blank() && matches!(matrices.cell_type(r, c), CellType::Text) {
                text_count += 1;
            }
        }
        let ratio = if grid.cols == 0 {
            0.0
        } else {
            text_count as f32 / grid.cols as f32
        };
        let bonus = ratio * TEXT_RATIO_BONUS_WEIGHT;
        if bonus > 0.0 {
            for c in 0..grid.cols {
                matrices.add_style(r, c, bonus);
            }
        }
    }
}

fn zero_hidden(grid: &Grid, matrices: &mut DerivedMatrices) {
    for &r in &grid.hidden_rows {
        if r < grid.rows {
            for c in 0..grid.cols {
                matrices.set_occupied(r, c, false);
            }
        }
    }
    for &c in &grid.hidden_cols {
        if c < grid.cols {
            for r in 0..grid.rows {
                matrices.set_occupied(r, c, false);
            }
        }
    }
}
