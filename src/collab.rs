//! Seams for the collaborators spec.md §1/§6 places out of scope.
//!
//! Mirrors the teacher's `DocumentReader`/`ReaderRegistry` pattern
//! (`src/reader/mod.rs`): the trait lives in this crate, concrete
//! implementations (writing delimited text to disk, building
//! `manifest.yml`) live with the caller. No implementation of either trait
//! ships here.

use crate::error::Result;
use crate::types::meta::{OutputItem, TableMeta};

/// Persists one assembled table. `rows` is the row-oriented, header-free,
/// cleaned table body — one `Vec<String>` per data row, columns aligned to
/// `meta.header.leaf_columns`.
pub trait OutputSink {
    fn write_table(&mut self, meta: &TableMeta, rows: &[Vec<String>]) -> Result<()>;
}

/// Accumulates the run manifest's output list and warning-code counts
/// (spec.md §6 "Manifest").
pub trait ManifestRecorder {
    fn record_output(&mut self, item: OutputItem);
    fn record_warning(&mut self, code: crate::types::meta::WarningCode);
}
