// In: src/error.rs

//! This module defines the single, unified error type for the entire sortnest library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Errors are raised where they are detected and travel up through the structural
//! mapper unwrapped. A failure at any leaf aborts the whole call.

use crate::types::ArrayKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderingError {
    // =========================================================================
    // === Ordering-Contract Errors
    // =========================================================================
    #[error("Axis {axis} is out of bounds for an array of rank {ndim}")]
    InvalidAxis { axis: isize, ndim: usize },

    #[error("Invalid dtype: {0}")]
    InvalidDtype(String),

    #[error("kth {kth} is out of bounds for an axis of length {len}")]
    InvalidKth { kth: isize, len: usize },

    #[error("Shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported data type for this operation: {0}")]
    UnsupportedType(String),

    // =========================================================================
    // === Structural-Mapping Errors
    // =========================================================================
    #[error("Key-chain '{0}' was not found in the container")]
    KeyChainNotFound(String),

    #[error("Unsupported leaf at '{key_chain}': expected an array or a sequence of arrays, found {found}")]
    UnsupportedLeafType { key_chain: String, found: String },

    // =========================================================================
    // === Dispatch Errors
    // =========================================================================
    #[error("No ordering backend is registered for {0} arrays")]
    BackendUnavailable(ArrayKind),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow compute kernels.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    /// An error from ndarray when an array cannot take a requested shape.
    #[error("ndarray shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error from the I/O subsystem (e.g. opening a log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrderingError {
    /// Shorthand for the `ShapeMismatch` variant from two shape slices.
    pub(crate) fn shape_mismatch(expected: &[usize], found: &[usize]) -> Self {
        OrderingError::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}
