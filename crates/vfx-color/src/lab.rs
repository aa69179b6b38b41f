//! CIE 1976 L\*a\*b\* conversion, built on top of [`crate::convert::RgbConvert`]'s
//! existing XYZ transform.
//!
//! Lab is used by operations that need a perceptually-uniform luminance axis
//! to calibrate against (edge-aware smoothing range sigmas, auto-levels
//! statistics) rather than raw linear or display-referred RGB.
//!
//! # Example
//!
//! ```rust
//! use vfx_color::lab::{srgb_to_lab, lab_to_srgb};
//!
//! let srgb = [0.5_f32, 0.3, 0.2];
//! let lab = srgb_to_lab(srgb);
//! let back = lab_to_srgb(lab);
//!
//! assert!((back[0] - srgb[0]).abs() < 0.01);
//! ```

use vfx_primaries::SRGB;
use vfx_transfer::srgb;

use crate::convert::RgbConvert;

/// D65 reference white in CIE XYZ (matches [`vfx_primaries::SRGB`]'s white point).
const WHITE_X: f32 = 0.95047;
const WHITE_Y: f32 = 1.0;
const WHITE_Z: f32 = 1.08883;

/// CIE linear/cube-root breakpoint, `(6/29)^3`.
const EPSILON: f32 = 216.0 / 24389.0;
/// CIE linear-segment slope at the breakpoint, `(29/3)^3`.
const KAPPA: f32 = 24389.0 / 27.0;

#[inline]
fn f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        (KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / KAPPA
    }
}

/// Converts CIE XYZ (D65) to CIE L\*a\*b\*.
///
/// `L` is in `[0, 100]`; `a`/`b` are unbounded (typically within roughly
/// `[-128, 127]` for in-gamut colors).
pub fn xyz_to_lab(xyz: [f32; 3]) -> [f32; 3] {
    let fx = f(xyz[0] / WHITE_X);
    let fy = f(xyz[1] / WHITE_Y);
    let fz = f(xyz[2] / WHITE_Z);

    [116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz)]
}

/// Converts CIE L\*a\*b\* back to CIE XYZ (D65).
pub fn lab_to_xyz(lab: [f32; 3]) -> [f32; 3] {
    let fy = (lab[0] + 16.0) / 116.0;
    let fx = fy + lab[1] / 500.0;
    let fz = fy - lab[2] / 200.0;

    [
        WHITE_X * f_inv(fx),
        WHITE_Y * f_inv(fy),
        WHITE_Z * f_inv(fz),
    ]
}

/// Converts a display-encoded sRGB pixel directly to CIE L\*a\*b\*.
pub fn srgb_to_lab(rgb: [f32; 3]) -> [f32; 3] {
    let xyz = rgb.linearize(srgb::eotf).to_xyz(&SRGB);
    xyz_to_lab(xyz)
}

/// Converts a CIE L\*a\*b\* pixel back to display-encoded sRGB.
///
/// Out-of-gamut results are not clamped; callers that need display-safe
/// output should clamp the result themselves (matching `vfx-ops`'
/// `clamp_01`-at-call-site convention rather than hiding the clamp here).
pub fn lab_to_srgb(lab: [f32; 3]) -> [f32; 3] {
    lab_to_xyz(lab).from_xyz(&SRGB).encode(srgb::oetf)
}
