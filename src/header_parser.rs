//! Header Parser (§4.3): Block + raw grid + `S`/`T` + merges → `HeaderHierarchy`.

use std::collections::HashMap;

use crate::config::PipelineConfig;
use crate::types::block::Block;
use crate::types::grid::Grid;
use crate::types::header::HeaderHierarchy;
use crate::types::matrices::{CellType, DerivedMatrices};

/// Reconstruct the header rows and leaf column names for one Block.
#[must_use]
pub fn parse_headers(
    block: &Block,
    grid: &Grid,
    matrices: &DerivedMatrices,
    config: &PipelineConfig,
) -> HeaderHierarchy {
    let header_rows = detect_header_rows(block, grid, matrices, config);

    let mut title_paths: HashMap<(usize, usize), Vec<String>> = HashMap::new();
    let leaf_columns = if header_rows.is_empty() {
        fallback_leaf_columns(block, grid)
    } else {
        expand_header_columns(block, grid, &header_rows, config, &mut title_paths)
    };

    let leaf_columns = disambiguate_duplicates(leaf_columns, &config.duplicate_col_suffix);

    HeaderHierarchy {
        header_rows,
        title_paths,
        leaf_columns,
    }
}

/// Row score `0.4·text_ratio + header_style_weight·style_mean +
/// 0.3·numeric_penalty`; rows scoring `> 0.4` are header rows, capped at
/// `max_header_rows` (§4.3 "Header-row detection"). `DateLike` cells count
/// toward neither `text_cells` nor `numeric_cells` — the reference ignores
/// them entirely rather than folding them into the numeric bucket.
///
/// A row also qualifies, regardless of the formula above, when most of its
/// columns sit directly beneath a multi-column merge from an earlier row:
/// that's the second (or deeper) level of a hierarchical header, and its
/// cells are routinely pure data-shaped values (e.g. bare years). The
/// reference gestures at this ("合并覆盖", left `简化处理`/simplified) without
/// folding it into the row-score formula; this reproduces the row-score
/// formula unchanged and adds the merge-coverage check as a separate
/// qualifying condition.
fn detect_header_rows(
    block: &Block,
    grid: &Grid,
    matrices: &DerivedMatrices,
    config: &PipelineConfig,
) -> Vec<usize> {
    let mut rows = Vec::new();
    let scan_end = (block.r0 + config.max_header_rows).min(block.r1);

    for r in block.r0..scan_end {
        let mut text_cells = 0usize;
        let mut numeric_cells = 0usize;
        for c in block.c0..block.c1 {
            match matrices.cell_type(r, c) {
                CellType::Text => {
                    text_cells += 1;
                }
                CellType::Numeric => {
                    numeric_cells += 1;
                }
                CellType::DateLike | CellType::Empty => {}
            }
        }
        let total = text_cells + numeric_cells;
        let text_ratio = if total == 0 {
            0.0
        } else {
            text_cells as f64 / total as f64
        };
        let numeric_ratio = if total == 0 {
            0.0
        } else {
            numeric_cells as f64 / total as f64
        };
        let numeric_penalty = 1.0 - numeric_ratio;
        let style_mean = matrices.row_style_mean(r, block.c0, block.c1) as f64;

        let score =
            0.4 * text_ratio + config.header_style_weight * style_mean + 0.3 * numeric_penalty;
        let coverage = merge_coverage(grid, block, r);
        if score > 0.4 || coverage >= 0.5 {
            rows.push(r);
        }
        if rows.len() >= config.max_header_rows {
            break;
        }
    }
    rows
}

/// Fraction of the block's columns at row `r` that sit directly beneath a
/// merge spanning more than one column and ending at row `r - 1`. Only the
/// row immediately below such a merge qualifies — a data row two levels
/// down from the merge is not part of the header band.
fn merge_coverage(grid: &Grid, block: &Block, r: usize) -> f64 {
    if block.width() == 0 || r == 0 {
        return 0.0;
    }
    let covered = (block.c0..block.c1)
        .filter(|&c| {
            grid.merges
                .iter()
                .any(|m| m.r1 == r - 1 && m.c0 <= c && c <= m.c1 && m.c1 > m.c0)
        })
        .count();
    covered as f64 / block.width() as f64
}

fn fallback_leaf_columns(block: &Block, grid: &Grid) -> Vec<String> {
    (block.c0..block.c1)
        .map(|c| {
            let value = grid.effective_value(block.r0, c);
            let text = value.trimmed_text();
            if text.is_empty() {
                format!("Column{c}")
            } else {
                text
            }
        })
        .collect()
}

/// Walk the retained header rows top-to-bottom for each column, collecting
/// the distinct non-empty strings seen (merge-anchor aware) into a title
/// path, then reduce each path to a leaf name (§4.3 "Header expansion").
fn expand_header_columns(
    block: &Block,
    grid: &Grid,
    header_rows: &[usize],
    config: &PipelineConfig,
    title_paths: &mut HashMap<(usize, usize), Vec<String>>,
) -> Vec<String> {
    let mut leaves = Vec::with_capacity(block.width());

    for c in block.c0..block.c1 {
        let mut path: Vec<String> = Vec::new();
        for &r in header_rows {
            let value = grid.effective_value(r, c);
            let text = value.trimmed_text();
            if text.is_empty() {
                continue;
            }
            if path.last().map(String::as_str) != Some(text.as_str()) && !path.contains(&text) {
                path.push(text);
            }
        }
        if let Some(&first_row) = header_rows.first() {
            title_paths.insert((first_row, c), path.clone());
        }

        let leaf = if path.is_empty() {
            format!("Column{c}")
        } else if config.keep_leaf_only {
            path.last().cloned().unwrap_or_else(|| format!("Column{c}"))
        } else {
            path.join("/")
        };
        leaves.push(leaf);
    }
    leaves
}

/// Rename the 2nd, 3rd, … occurrence of each repeated name by appending the
/// configured suffix templated with the running occurrence count, starting
/// at 1 — the first occurrence of a name is always left bare (§4.3
/// "Duplicate-name disambiguation").
fn disambiguate_duplicates(names: Vec<String>, suffix_template: &str) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let count = seen.entry(name.clone()).or_insert(0);
        if *count == 0 {
            out.push(name);
        } else {
            let suffix = suffix_template.replace("{n}", &count.to_string());
            out.push(format!("{name}{suffix}"));
        }
        *count += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid_builder::build_matrices;
    use crate::types::grid::{CellValue, MergedRange};

    fn grid_with(rows: usize, cols: usize, cells: &[(usize, usize, &str)]) -> Grid {
        let mut grid = Grid::new(None, rows, cols);
        for &(r, c, v) in cells {
            grid.set(r, c, CellValue::Text(v.to_string()));
        }
        grid
    }

    #[test]
    fn single_header_row_detected() {
        let grid = grid_with(
            4,
            3,
            &[
                (0, 0, "Name"),
                (0, 1, "Qty"),
                (0, 2, "Price"),
                (1, 0, "Alice"),
            ],
        );
        let mut grid = grid;
        grid.set(1, 1, CellValue::Number(2.0));
        grid.set(1, 2, CellValue::Number(10.0));
        let config = PipelineConfig::default();
        let matrices = build_matrices(&grid, &config);
        let block = Block::new(0, 4, 0, 3);
        let header = parse_headers(&block, &grid, &matrices, &config);
        assert_eq!(header.header_rows, vec![0]);
        assert_eq!(header.leaf_columns, vec!["Name", "Qty", "Price"]);
    }

    #[test]
    fn merged_two_level_header_path_joined() {
        let mut grid = Grid::new(None, 2, 4);
        grid.set(0, 0, CellValue::Text("Revenue".to_string()));
        grid.set(0, 2, CellValue::Text("Cost".to_string()));
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 0, c1: 1 });
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 2, c1: 3 });
        grid.set(1, 0, CellValue::Text("2023".to_string()));
        grid.set(1, 1, CellValue::Text("2024".to_string()));
        grid.set(1, 2, CellValue::Text("2023".to_string()));
        grid.set(1, 3, CellValue::Text("2024".to_string()));

        let config = PipelineConfig::default();
        let block = Block::new(0, 2, 0, 4);
        let header_rows = vec![0, 1];
        let mut title_paths = HashMap::new();
        let leaves = expand_header_columns(&block, &grid, &header_rows, &config, &mut title_paths);
        assert_eq!(leaves, vec!["Revenue/2023", "Revenue/2024", "Cost/2023", "Cost/2024"]);
    }

    #[test]
    fn merged_two_level_header_leaf_only_suffixes_duplicates() {
        let mut grid = Grid::new(None, 2, 4);
        grid.set(0, 0, CellValue::Text("Revenue".to_string()));
        grid.set(0, 2, CellValue::Text("Cost".to_string()));
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 0, c1: 1 });
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 2, c1: 3 });
        grid.set(1, 0, CellValue::Text("2023".to_string()));
        grid.set(1, 1, CellValue::Text("2024".to_string()));
        grid.set(1, 2, CellValue::Text("2023".to_string()));
        grid.set(1, 3, CellValue::Text("2024".to_string()));

        let config = PipelineConfig::default().with_keep_leaf_only(true);
        let block = Block::new(0, 2, 0, 4);
        let header_rows = vec![0, 1];
        let mut title_paths = HashMap::new();
        let leaves = expand_header_columns(&block, &grid, &header_rows, &config, &mut title_paths);
        let leaves = disambiguate_duplicates(leaves, &config.duplicate_col_suffix);
        assert_eq!(leaves, vec!["2023", "2024", "2023_1", "2024_1"]);
    }

    #[test]
    fn no_header_row_falls_back_to_first_row() {
        let mut grid = Grid::new(None, 2, 2);
        grid.set(0, 0, CellValue::Number(1.0));
        grid.set(0, 1, CellValue::Number(2.0));
        grid.set(1, 0, CellValue::Number(3.0));
        grid.set(1, 1, CellValue::Number(4.0));
        let config = PipelineConfig::default();
        let matrices = build_matrices(&grid, &config);
        let block = Block::new(0, 2, 0, 2);
        let header = parse_headers(&block, &grid, &matrices, &config);
        assert!(header.header_rows.is_empty());
        assert_eq!(header.leaf_columns, vec!["1", "2"]);
    }

    #[test]
    fn second_header_row_retained_via_merge_coverage_despite_numeric_content() {
        let mut grid = Grid::new(None, 2, 4);
        grid.set(0, 0, CellValue::Text("Revenue".to_string()));
        grid.set(0, 2, CellValue::Text("Cost".to_string()));
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 0, c1: 1 });
        grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 2, c1: 3 });
        // Years, unquoted: the grid builder classifies these as Numeric
        // (§3/§9), same as the reference's own numeric-before-date-like
        // ordering note for strings like "2024".
        grid.set(1, 0, CellValue::Text("2023".to_string()));
        grid.set(1, 1, CellValue::Text("2024".to_string()));
        grid.set(1, 2, CellValue::Text("2023".to_string()));
        grid.set(1, 3, CellValue::Text("2024".to_string()));

        let config = PipelineConfig::default();
        let matrices = build_matrices(&grid, &config);
        let block = Block::new(0, 2, 0, 4);
        let header_rows = detect_header_rows(&block, &grid, &matrices, &config);
        assert_eq!(header_rows, vec![0, 1]);
    }

    #[test]
    fn empty_header_cell_uses_column_fallback_name() {
        let names = vec!["Column1".to_string()];
        assert_eq!(disambiguate_duplicates(names.clone(), "_{n}"), names);
    }
}
