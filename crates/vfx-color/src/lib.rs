//! # vfx-color
//!
//! Color-space conversion for the retouch/healing/bilateral engines: RGB/XYZ
//! transforms and a CIE L\*a\*b\* layer used wherever an operation needs a
//! perceptually-uniform luminance axis to calibrate against.
//!
//! # Architecture
//!
//! ```text
//!                    vfx-color
//!                        |
//!     +------------------+------------------+
//!     |                                      |
//! vfx-transfer                        vfx-primaries
//!     |                                      |
//!     +------------------+-------------------+
//!                        |
//!                    vfx-math
//!                        |
//!                    vfx-core
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use vfx_color::convert::RgbConvert;
//! use vfx_color::lab::srgb_to_lab;
//!
//! let rgb = [0.5_f32, 0.3, 0.2];
//! let lab = srgb_to_lab(rgb);
//! ```
//!
//! # Dependencies
//!
//! - [`vfx-core`] - Core types (`Error`, `Rect`)
//! - [`vfx-math`] - Vec3/Mat3 and chromatic adaptation
//! - [`vfx-transfer`] - Transfer function implementations (sRGB EOTF/OETF)
//! - [`vfx-primaries`] - Color space primaries and RGB/XYZ matrices
//!
//! # Used By
//!
//! - `vfx-bilateral` - Lab luminance axis for the bilateral grid's range dimension
//! - `vfx-retouch` - Lab round-trip for the optional blur-in-Lab shape operator

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod convert;
pub mod lab;

pub use convert::{Convert, RgbConvert};

// Re-export sub-crates for convenience
pub use vfx_transfer as transfer;
pub use vfx_primaries as primaries;
pub use vfx_math as math;

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::{Convert, RgbConvert};
    pub use crate::lab::{lab_to_srgb, srgb_to_lab};

    // Re-export common transfer functions
    pub use vfx_transfer::srgb;

    // Re-export primaries and matrix functions
    pub use vfx_primaries::{Primaries, SRGB, rgb_to_xyz_matrix, xyz_to_rgb_matrix};

    // Re-export math
    pub use vfx_math::{Vec3, Mat3};

    // Re-export adaptation
    pub use vfx_math::{adapt_matrix, BRADFORD, D65};
}
