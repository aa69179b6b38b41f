//! # vfx-heal
//!
//! Seamless cloning via a Poisson/Laplace solve: blends a source patch into
//! a destination image so that their *difference* varies smoothly across a
//! masked region, avoiding the hard seam a plain copy-paste would leave.
//!
//! Based on T. Georgiev's "Photoshop Healing Brush" formulation, solved with
//! a red/black checkerboard Gauss-Seidel iteration and successive
//! over-relaxation.
//!
//! # Example
//!
//! ```rust
//! use vfx_heal::heal;
//!
//! let width = 8;
//! let height = 8;
//! let channels = 1;
//! let src = vec![0.3f32; width * height];
//! let mut dest = vec![0.7f32; width * height];
//! let mask = vec![1.0f32; width * height];
//!
//! heal(&src, &mut dest, &mask, width, height, channels).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod solver;

pub use error::{HealError, Result};
pub use solver::heal;
