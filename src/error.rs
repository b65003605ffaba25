//! Error taxonomy for the grid-analysis / table-recovery pipeline.

use thiserror::Error;

/// Errors surfaced by this crate's pipeline.
///
/// Variants map onto the taxonomy kinds the caller-facing runner is expected
/// to recognize: `InvalidArgument` and `UnsupportedFormat` are caller
/// contract violations (fail before any work begins), `FileRead` and
/// `OutputWrite` belong to the external decoder/emitter and are only
/// threaded through here so a unified `Result` can flow end to end.
#[derive(Debug, Error)]
pub enum GridTableError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("unsupported format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("failed to read input: {reason}")]
    FileRead { reason: String },

    #[error("failed to write output: {reason}")]
    OutputWrite { reason: String },
}

pub type Result<T> = std::result::Result<T, GridTableError>;
