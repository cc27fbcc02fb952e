//! Workspace error types.
//!
//! Sub-crates define their own error enums and convert `CoreError` into them
//! via `From`.  `GeodesicError` is not a `CoreError` variant:
//! it is recovered where it happens and only ever logged.

use thiserror::Error;

use crate::GeoPoint;

/// The top-level error type for `hc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed input or an out-of-domain parameter, detected before any
    /// computation starts.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single distance calculation could not be performed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("cannot compute geodesic distance: coordinate {point} is non-finite or out of range")]
pub struct GeodesicError {
    pub point: GeoPoint,
}

/// Shorthand result type for `hc-core`.
pub type CoreResult<T> = Result<T, CoreError>;
