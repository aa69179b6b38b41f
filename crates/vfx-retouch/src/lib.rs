//! # vfx-retouch
//!
//! À-trous wavelet decompose/recompose driver with four per-scale shape
//! operators (clone, heal, blur, fill), built on [`vfx_bilateral`] and
//! [`vfx_heal`] for the filtering primitives each operator needs.
//!
//! The driver itself ([`process::retouch_process`]) owns no shape geometry:
//! it consumes a [`rasterizer::ShapeRasterizer`] implementation and a list
//! of [`shape::ShapeRecord`]s, walking scales fine-to-coarse and dispatching
//! each live shape to its operator in [`ops`].
//!
//! # Example
//!
//! ```rust
//! use vfx_retouch::{Levels, RetouchParams, Tile, retouch_process};
//! use vfx_retouch::rasterizer::GeometryRasterizer;
//! use vfx_core::Rect;
//!
//! let width = 16;
//! let height = 16;
//! let input = vec![50.0f32; width * height * 4];
//! let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
//! let rasterizer = GeometryRasterizer::default();
//!
//! let params = RetouchParams {
//!     shapes: &[],
//!     rasterizer: &rasterizer,
//!     num_scales: 2,
//!     merge_from_scale: 0,
//!     levels: Levels::default(),
//!     display_scale: None,
//!     suppress_mask_display: false,
//!     auto_levels: false,
//! };
//!
//! let output = retouch_process(&tile, &input, &params).unwrap();
//! assert_eq!(output.pixels.len(), input.len());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod levels;
pub mod ops;
pub mod process;
pub mod rasterizer;
pub mod rect_ops;
pub mod shape;
pub mod tile;
pub mod tiling;
pub mod wavelet;

pub use error::{Result, RetouchError};
pub use levels::{apply_levels, Levels};
pub use process::{retouch_process, RetouchOutput, RetouchParams};
pub use rasterizer::{GeometryRasterizer, RasterizedMask, ShapeRasterizer};
pub use shape::{Algorithm, BlurType, FillMode, ShapeGeometry, ShapeRecord};
pub use tile::Tile;
pub use tiling::{bilateral_tiling, gaussian_tiling, wavelet_tiling, TileMemory};
pub use wavelet::{decompose, recompose, Pyramid};
