//! Orchestration glue: sequences the five stages per sheet and assigns the
//! global `df1, df2, …` keys in block-discovery order (§2, §4.5, §5).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assembler::{assemble_table, AssembledTable};
use crate::block_splitter::split_blocks;
use crate::cleaner::{extract_unit_line, find_mid_header_rows, score_block, select_main_table};
use crate::config::PipelineConfig;
use crate::error::{GridTableError, Result};
use crate::grid_builder::build_matrices;
use crate::header_parser::parse_headers;
use crate::types::grid::Grid;

/// The default `unit_line_patterns` (§6), compiled once and reused whenever
/// a caller hasn't overridden them — the common case, since most callers
/// take `PipelineConfig::default()`.
static DEFAULT_UNIT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    PipelineConfig::default()
        .unit_line_patterns
        .iter()
        .map(|p| Regex::new(p).expect("default unit_line_patterns must compile"))
        .collect()
});

/// Run the full grid-analysis pipeline over every sheet, in order.
///
/// Sheets are independent (§5): each sheet's derived matrices are built,
/// consumed, and dropped before the next sheet starts. The returned tables
/// are ordered by discovery, matching the `df1, df2, …` keys assigned to
/// them.
pub fn run_pipeline(grids: &[Grid], config: &PipelineConfig) -> Result<Vec<AssembledTable>> {
    let unit_patterns = compile_unit_patterns(config)?;

    log::info!("run.start sheets={}", grids.len());

    let mut all_tables = Vec::new();
    let mut df_counter = 1usize;

    for grid in grids {
        let matrices = build_matrices(grid, config);
        log::debug!(
            "grid.build sheet={:?} rows={} cols={}",
            grid.sheet_name,
            grid.rows,
            grid.cols
        );

        let blocks = split_blocks(&matrices, config);
        log::debug!("split.blocks sheet={:?} blocks={}", grid.sheet_name, blocks.len());
        if blocks.is_empty() {
            continue;
        }

        let mut headers = Vec::with_capacity(blocks.len());
        let mut scores = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let header = parse_headers(block, grid, &matrices, config);
            log::debug!(
                "header.detect block_id={} header_rows={:?}",
                block.block_id,
                header.header_rows
            );
            let score = score_block(block, &matrices, &header);
            log::debug!("score.block block_id={} total={:.3}", block.block_id, score.total);
            headers.push(header);
            scores.push(score);
        }

        let main_index = select_main_table(&scores);

        for (i, block) in blocks.into_iter().enumerate() {
            let header = headers.remove(0);
            let score = scores[i];
            let is_main = main_index == Some(i);

            let mid_header_rows = if config.allow_mid_headers {
                find_mid_header_rows(&block, grid, &header)
            } else {
                Vec::new()
            };
            let units = extract_unit_line(&block, grid, &unit_patterns);

            let key = format!("df{df_counter}");
            df_counter += 1;

            log::debug!("table.assemble key={key} block_id={} is_main={is_main}", block.block_id);
            all_tables.push(assemble_table(
                key,
                &block,
                grid,
                header,
                score,
                is_main,
                &mid_header_rows,
                units,
            ));
        }
    }

    log::info!("run.end tables_emitted={}", all_tables.len());
    Ok(all_tables)
}

fn compile_unit_patterns(config: &PipelineConfig) -> Result<Vec<Regex>> {
    if config.unit_line_patterns == PipelineConfig::default().unit_line_patterns {
        return Ok(DEFAULT_UNIT_PATTERNS.clone());
    }
    config
        .unit_line_patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| GridTableError::InvalidArgument {
                message: format!("invalid unit_line_patterns entry {p:?}: {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::grid::CellValue;

    fn dense_sheet() -> Grid {
        let mut grid = Grid::new(Some("Sheet1".to_string()), 4, 3);
        grid.set(0, 0, CellValue::Text("Name".to_string()));
        grid.set(0, 1, CellValue::Text("Qty".to_string()));
        grid.set(0, 2, CellValue::Text("Price".to_string()));
        for r in 1..4 {
            grid.set(r, 0, CellValue::Text(format!("Row{r}")));
            grid.set(r, 1, CellValue::Number(r as f64));
            grid.set(r, 2, CellValue::Number(r as f64 * 10.0));
        }
        grid
    }

    #[test]
    fn single_sheet_single_table_assigned_df1() {
        let grid = dense_sheet();
        let config = PipelineConfig::default();
        let tables = run_pipeline(&[grid], &config).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].meta.key, "df1");
        assert!(tables[0].meta.is_main);
        assert_eq!(tables[0].columns, vec!["Name", "Qty", "Price"]);
    }

    #[test]
    fn keys_increment_across_sheets() {
        let a = dense_sheet();
        let b = dense_sheet();
        let config = PipelineConfig::default();
        let tables = run_pipeline(&[a, b], &config).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].meta.key, "df1");
        assert_eq!(tables[1].meta.key, "df2");
    }

    #[test]
    fn empty_grid_produces_no_tables() {
        let grid = Grid::new(None, 0, 0);
        let config = PipelineConfig::default();
        let tables = run_pipeline(&[grid], &config).unwrap();
        assert!(tables.is_empty());
    }
}
