//! # vfx-core
//!
//! Core types shared by the edge-aware tone manipulation engines:
//!
//! - [`ColorSpace`] - Trait and marker types for compile-time color space safety,
//!   bridged to [`vfx_primaries`] at the matrix layer (used by `vfx-color`'s
//!   Lab round trip)
//! - [`AlignedBuffer`] - RAII scratch-buffer allocation for per-invocation working memory
//! - [`Error`] - Crate-wide error type, with per-engine errors wrapping it
//! - [`Rect`], [`Roi`] - Region of interest types for tiled processing
//!
//! ## Crate Structure
//!
//! This crate is the foundation of the workspace and has no internal dependencies.
//! The engines depend on it directly; `vfx-color` depends on it both directly
//! (for the `ColorSpaceId` bridge) and transitively through
//! `vfx-primaries`/`vfx-transfer`:
//!
//! ```text
//! vfx-core (this crate)
//!    ^
//!    +-- vfx-primaries (ColorSpaceId -> Primaries)
//!    +-- vfx-bilateral, vfx-heal, vfx-retouch (engines)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod alloc;
pub mod colorspace;
pub mod error;
pub mod rect;

// Re-exports for convenience
pub use alloc::AlignedBuffer;
pub use colorspace::*;
pub use error::*;
pub use rect::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use vfx_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::alloc::AlignedBuffer;
    pub use crate::colorspace::{ColorSpace, ColorSpaceId, Srgb};
    pub use crate::error::{Error, Result};
    pub use crate::rect::{Rect, Roi};
}
