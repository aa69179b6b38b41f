//! # vfx-bilateral
//!
//! The bilateral grid: an O(1)-per-pixel approximation of edge-aware
//! smoothing, built by splatting pixels into a downsampled `(x, y, luma)`
//! histogram, blurring that histogram, and resampling it back at full
//! resolution.
//!
//! # Pipeline
//!
//! ```text
//! BilateralGrid::init  -- allocate the grid for an image size + sigmas
//!         |
//!         v
//! BilateralGrid::splat  -- distribute pixel weight into the grid
//!         |
//!         v
//! BilateralGrid::blur   -- separable 3-axis smoothing of the grid
//!         |
//!         v
//! BilateralGrid::slice / slice_to_output  -- resample at full resolution
//! ```
//!
//! # Example
//!
//! ```rust
//! use vfx_bilateral::BilateralGrid;
//!
//! let width = 32;
//! let height = 32;
//! let image = vec![0.5f32; width * height * 4];
//!
//! let mut grid = BilateralGrid::init(width, height, 8.0, 8.0).unwrap();
//! grid.splat(&image).unwrap();
//! grid.blur();
//!
//! let mut out = vec![0.0f32; image.len()];
//! grid.slice(&image, &mut out, -1.0).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod grid;

pub use error::{BilateralError, Result};
pub use grid::{memory_use, singlebuffer_size, BilateralGrid};
