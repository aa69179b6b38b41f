//! Error types for the wavelet retouch driver.

use thiserror::Error;

/// Result type alias using [`RetouchError`] as the error type.
pub type Result<T> = std::result::Result<T, RetouchError>;

/// Errors that can occur while running [`crate::retouch_process`].
#[derive(Debug, Error)]
pub enum RetouchError {
    /// `num_scales`, a levels triple, or another numeric parameter was out
    /// of its documented range.
    #[error("invalid retouch parameters: {0}")]
    InvalidParameter(String),

    /// Input/output/working buffer length didn't match `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} floats, got {got} ({what})")]
    SizeMismatch {
        /// What buffer failed the check.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Pyramid level or per-shape temporary allocation failed.
    #[error(transparent)]
    AllocationFailed(#[from] vfx_core::Error),

    /// The bilateral-mode blur operator failed while splatting or slicing.
    #[error(transparent)]
    BilateralFailed(#[from] vfx_bilateral::BilateralError),

    /// The heal operator's solver failed.
    #[error(transparent)]
    HealFailed(#[from] vfx_heal::HealError),
}

impl RetouchError {
    /// Creates a [`RetouchError::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// `true` when this error is (or wraps) an allocation failure, the one
    /// condition [`crate::retouch_process`] recovers from by falling back
    /// to a pass-through copy of the input rather than propagating `Err`.
    /// `InvalidParameter` and `SizeMismatch` are caller bugs and always
    /// propagate; a failed solver/bilateral call for any other reason does
    /// too, since those indicate a logic error rather than a resource
    /// shortage.
    pub fn is_allocation_failure(&self) -> bool {
        match self {
            Self::AllocationFailed(_) => true,
            Self::BilateralFailed(e) => e.is_allocation_failure(),
            Self::HealFailed(e) => e.is_allocation_failure(),
            Self::InvalidParameter(_) | Self::SizeMismatch { .. } => false,
        }
    }
}
