//! Error types for bilateral grid operations.

use thiserror::Error;

/// Result type alias using [`BilateralError`] as the error type.
pub type Result<T> = std::result::Result<T, BilateralError>;

/// Errors that can occur while building or applying a bilateral grid.
#[derive(Debug, Error)]
pub enum BilateralError {
    /// Width, height, or either sigma was zero or non-finite.
    #[error("invalid bilateral parameters: {0}")]
    InvalidParameter(String),

    /// Input/output buffer length didn't match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} floats, got {got}")]
    SizeMismatch {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        got: usize,
    },

    /// Grid buffer allocation failed.
    #[error(transparent)]
    AllocationFailed(#[from] vfx_core::Error),
}

impl BilateralError {
    /// Creates an [`BilateralError::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// `true` for the one variant callers may recover from by falling back
    /// to a pass-through copy, per the core's error-handling contract:
    /// allocation failure is reported but never crashes the caller.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailed(_))
    }
}
