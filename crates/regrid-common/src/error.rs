//! Error types for regridding operations.

use thiserror::Error;

/// Errors that can occur while building lattices or regridding fields.
#[derive(Error, Debug)]
pub enum RegridError {
    /// A coordinate axis is malformed (too short, non-monotonic, duplicates).
    #[error("invalid coordinate axis: {0}")]
    InvalidAxis(String),

    /// A triangulation cannot be formed from the source points.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// The requested target lattice policy is not recognized.
    #[error("unsupported lattice: {0}")]
    UnsupportedLattice(String),

    /// A required dimension is absent from the field.
    #[error("missing axis: {0}")]
    MissingAxis(String),

    /// The data array does not match the declared axis lengths.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}

impl RegridError {
    /// Create an InvalidAxis error.
    pub fn invalid_axis(msg: impl Into<String>) -> Self {
        Self::InvalidAxis(msg.into())
    }

    /// Create a DegenerateGeometry error.
    pub fn degenerate_geometry(msg: impl Into<String>) -> Self {
        Self::DegenerateGeometry(msg.into())
    }

    /// Create an UnsupportedLattice error.
    pub fn unsupported_lattice(msg: impl Into<String>) -> Self {
        Self::UnsupportedLattice(msg.into())
    }

    /// Create a MissingAxis error.
    pub fn missing_axis(msg: impl Into<String>) -> Self {
        Self::MissingAxis(msg.into())
    }
}

/// Result type for regridding operations.
pub type Result<T> = std::result::Result<T, RegridError>;
