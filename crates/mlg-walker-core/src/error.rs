//! Error taxonomy for the sampling core

use thiserror::Error;

/// Errors reported before any sampling or corruption starts.
///
/// A walk that runs into a node without an eligible transition is not an
/// error: it is padded with its last node (see [`crate::sample`]).
#[derive(Error, Debug)]
pub enum WalkError {
    /// Malformed CSR arrays (non-monotonic `row_ptr`, out-of-range `col_idx`,
    /// length mismatch, negative or non-finite weights)
    #[error("Invalid graph structure: {0}")]
    InvalidGraphStructure(String),

    /// Out-of-range numeric parameter or empty input sequence
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A temporal policy was requested without complete node dates
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type WalkResult<T> = Result<T, WalkError>;
