//! Small ROI helpers the per-shape operators share.
//!
//! Every operator clips a shape's nominal footprint against the working
//! tile before touching any pixels rather than trusting the shape's own
//! rectangle, since a shape authored off-canvas or partly outside the
//! current tile is a routine case, not an error.

use vfx_core::Rect;

/// Intersects two ROIs, returning `None` if they don't overlap.
///
/// Thin wrapper over [`Rect::intersect`] kept as its own entry point
/// because every per-shape operator calls it at the same point in its
/// pipeline (clip-before-copy), making it a natural single place to adjust
/// if that contract ever needs to change.
pub fn intersect_rois(a: Rect, b: Rect) -> Option<Rect> {
    a.intersect(&b)
}

/// Grows `r` by `pad` pixels on every edge, then clips the result to
/// `bounds`.
///
/// Used by the heal operator, which needs one pixel of context around its
/// mask for a well-defined Dirichlet boundary. Saturates at zero instead of
/// panicking when `r` sits at the edge of `bounds`.
pub fn pad_and_clip(r: Rect, pad: u32, bounds: Rect) -> Rect {
    let x = r.x.saturating_sub(pad).max(bounds.x);
    let y = r.y.saturating_sub(pad).max(bounds.y);
    let right = r.right().saturating_add(pad).min(bounds.right());
    let bottom = r.bottom().saturating_add(pad).min(bounds.bottom());
    Rect::from_corners(x, y, right.max(x), bottom.max(y))
}
