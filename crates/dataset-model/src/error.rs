//! Error types for the dataset model.

use thiserror::Error;

/// Errors raised by dataset lookups and coordinate reads.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The named variable does not exist in the dataset.
    #[error("variable '{0}' not found")]
    VariableNotFound(String),

    /// The named dimension does not exist in the dataset.
    #[error("dimension '{0}' not found")]
    DimensionNotFound(String),

    /// The variable has no in-memory values to read.
    #[error("variable '{0}' has no coordinate values")]
    NoValues(String),

    /// A coordinate read asked for indices beyond the stored values.
    #[error("index range {start}..{end} out of bounds for variable '{variable}' of length {len}")]
    IndexOutOfRange {
        variable: String,
        start: usize,
        end: usize,
        len: usize,
    },
}
