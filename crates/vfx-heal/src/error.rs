//! Error types for the healing solver.

use thiserror::Error;

/// Result type alias using [`HealError`] as the error type.
pub type Result<T> = std::result::Result<T, HealError>;

/// Errors that can occur while running [`crate::heal`].
#[derive(Debug, Error)]
pub enum HealError {
    /// `src`, `dest`, or `mask` had an unexpected length for the given
    /// `width`/`height`/`channels`.
    #[error("buffer size mismatch: expected {expected}, got {got} ({what})")]
    SizeMismatch {
        /// What buffer failed the check.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Width, height, or channel count was zero.
    #[error("invalid heal parameters: {0}")]
    InvalidParameter(String),

    /// Coefficient array allocation failed.
    #[error(transparent)]
    AllocationFailed(#[from] vfx_core::Error),
}

impl HealError {
    /// Creates a [`HealError::InvalidParameter`] error.
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
