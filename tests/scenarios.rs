use gridtable_recover::config::PipelineConfig;
use gridtable_recover::pipeline::run_pipeline;
use gridtable_recover::types::grid::{CellStyle, CellValue, Grid, MergedRange};

fn set_text(grid: &mut Grid, r: usize, c: usize, v: &str) {
    grid.set(r, c, CellValue::Text(v.to_string()));
}

/// Exercises the pipeline's `log` output at `RUST_LOG=debug` without
/// asserting on it; safe to call from every test since repeat calls after
/// the first are no-ops.
fn init_logging() {
    let _ = env_logger::try_init();
}

#[test]
fn s1_single_dense_table() {
    init_logging();
    let mut grid = Grid::new(None, 4, 3);
    set_text(&mut grid, 0, 0, "Name");
    set_text(&mut grid, 0, 1, "Qty");
    set_text(&mut grid, 0, 2, "Price");
    let mut styles = std::collections::HashMap::new();
    for c in 0..3 {
        styles.insert((0, c), CellStyle { bold: true, fill: false });
    }
    grid.styles = Some(styles);
    for r in 1..4 {
        set_text(&mut grid, r, 0, &format!("Row{r}"));
        grid.set(r, 1, CellValue::Number(r as f64));
        grid.set(r, 2, CellValue::Number(r as f64 * 10.0));
    }

    let config = PipelineConfig::default();
    let tables = run_pipeline(&[grid], &config).unwrap();

    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert_eq!(table.meta.bbox, (0, 4, 0, 3));
    assert_eq!(table.meta.header.header_rows, vec![0]);
    assert_eq!(table.columns, vec!["Name", "Qty", "Price"]);
    assert!(table.meta.is_main);
    assert!((table.meta.score.density - 1.0).abs() < f64::EPSILON);
    assert!(table.meta.score.total >= 0.7, "total={}", table.meta.score.total);
}

#[test]
fn s2_two_side_by_side_tables() {
    init_logging();
    let mut grid = Grid::new(None, 6, 7);
    for r in 0..6 {
        for c in 0..3 {
            set_text(&mut grid, r, c, &format!("L{r}{c}"));
        }
        for c in 4..7 {
            set_text(&mut grid, r, c, &format!("R{r}{c}"));
        }
    }

    let config = PipelineConfig::default();
    let tables = run_pipeline(&[grid], &config).unwrap();

    assert_eq!(tables.len(), 2);
    assert_eq!((tables[0].meta.bbox.2, tables[0].meta.bbox.3), (0, 3));
    assert_eq!((tables[1].meta.bbox.2, tables[1].meta.bbox.3), (4, 7));
    let main_count = tables.iter().filter(|t| t.meta.is_main).count();
    assert_eq!(main_count, 1);
}

#[test]
fn s3_two_level_header_with_merges_path_joined() {
    init_logging();
    let mut grid = Grid::new(None, 4, 4);
    set_text(&mut grid, 0, 0, "Revenue");
    set_text(&mut grid, 0, 2, "Cost");
    grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 0, c1: 1 });
    grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 2, c1: 3 });
    set_text(&mut grid, 1, 0, "2023");
    set_text(&mut grid, 1, 1, "2024");
    set_text(&mut grid, 1, 2, "2023");
    set_text(&mut grid, 1, 3, "2024");
    for r in 2..4 {
        for c in 0..4 {
            grid.set(r, c, CellValue::Number((r * 10 + c) as f64));
        }
    }

    let config = PipelineConfig::default();
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(
        tables[0].columns,
        vec!["Revenue/2023", "Revenue/2024", "Cost/2023", "Cost/2024"]
    );
}

#[test]
fn s3_two_level_header_with_merges_leaf_only_suffixes_duplicates() {
    init_logging();
    let mut grid = Grid::new(None, 4, 4);
    set_text(&mut grid, 0, 0, "Revenue");
    set_text(&mut grid, 0, 2, "Cost");
    grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 0, c1: 1 });
    grid.merges.push(MergedRange { r0: 0, r1: 0, c0: 2, c1: 3 });
    set_text(&mut grid, 1, 0, "2023");
    set_text(&mut grid, 1, 1, "2024");
    set_text(&mut grid, 1, 2, "2023");
    set_text(&mut grid, 1, 3, "2024");
    for r in 2..4 {
        for c in 0..4 {
            grid.set(r, c, CellValue::Number((r * 10 + c) as f64));
        }
    }

    let config = PipelineConfig::default().with_keep_leaf_only(true);
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].columns, vec!["2023", "2024", "2023_1", "2024_1"]);
}

#[test]
fn s4_mid_stream_header_repetition_removed() {
    init_logging();
    let mut grid = Grid::new(None, 11, 2);
    set_text(&mut grid, 0, 0, "Name");
    set_text(&mut grid, 0, 1, "Qty");
    for r in 1..11 {
        if r == 6 {
            set_text(&mut grid, r, 0, "Name");
            set_text(&mut grid, r, 1, "Qty");
        } else {
            set_text(&mut grid, r, 0, &format!("Row{r}"));
            grid.set(r, 1, CellValue::Number(r as f64));
        }
    }

    let config = PipelineConfig::default();
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    let table = &tables[0];
    assert!(table
        .meta
        .warnings
        .contains(&gridtable_recover::types::WarningCode::MidHeadersRemoved));
    assert_eq!(table.rows.len(), 9);
}

#[test]
fn s5_unit_line_captured_as_metadata() {
    init_logging();
    let mut grid = Grid::new(None, 5, 2);
    set_text(&mut grid, 0, 0, "单位：万元");
    set_text(&mut grid, 1, 0, "Name");
    set_text(&mut grid, 1, 1, "Qty");
    for r in 2..5 {
        set_text(&mut grid, r, 0, &format!("Row{r}"));
        grid.set(r, 1, CellValue::Number(r as f64));
    }

    let config = PipelineConfig::default();
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].meta.units.as_deref(), Some("单位：万元"));
}

#[test]
fn s6_hidden_column_excluded_from_occupancy() {
    init_logging();
    let mut grid = Grid::new(None, 4, 3);
    for r in 0..4 {
        for c in 0..3 {
            grid.set(r, c, CellValue::Number((r * 3 + c) as f64));
        }
    }
    grid.hidden_cols.insert(2);

    let config = PipelineConfig::default().with_min_block_size(2, 2);
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].meta.bbox, (0, 4, 0, 2));
}

#[test]
fn include_hidden_config_restores_excluded_column() {
    init_logging();
    let mut grid = Grid::new(None, 4, 3);
    for r in 0..4 {
        for c in 0..3 {
            grid.set(r, c, CellValue::Number((r * 3 + c) as f64));
        }
    }
    grid.hidden_cols.insert(2);

    let config = PipelineConfig::default()
        .with_min_block_size(2, 2)
        .with_include_hidden(true);
    let tables = run_pipeline(&[grid], &config).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].meta.bbox, (0, 4, 0, 3));
}
