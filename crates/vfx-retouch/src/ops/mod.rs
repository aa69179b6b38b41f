//! The four per-shape operators a wavelet scale dispatches to: clone, heal,
//! blur, and fill. Each touches only the first three channels of its
//! working band — the fourth (alpha/mask-display) channel is the driver's
//! own concern, not an operator's.

pub mod blur;
pub mod clone;
pub mod fill;
pub mod heal;

use vfx_core::Rect;

use crate::rasterizer::RasterizedMask;
use crate::rect_ops::{intersect_rois, pad_and_clip};
use crate::tile::Tile;

/// Scales an authoring-resolution mask bounding box up to tile resolution.
pub(crate) fn scaled_mask_rect(mask_rect: Rect, scale: f32) -> Rect {
    Rect::new(
        (mask_rect.x as f32 * scale).round() as u32,
        (mask_rect.y as f32 * scale).round() as u32,
        ((mask_rect.width as f32 * scale).round() as u32).max(1),
        ((mask_rect.height as f32 * scale).round() as u32).max(1),
    )
}

/// Coverage at tile-absolute pixel `(abs_x, abs_y)`, nearest-sampled from
/// the authoring-resolution mask.
pub(crate) fn sample_mask(mask: &RasterizedMask, tile: &Tile, abs_x: u32, abs_y: u32) -> f32 {
    let mx = abs_x as f32 / tile.scale;
    let my = abs_y as f32 / tile.scale;
    mask.sample(mx.floor() as i64, my.floor() as i64)
}

/// The tile-local region (never trusting the shape's own rectangle) a mask
/// actually overlaps, clipped to the tile and padded by `pad` pixels.
///
/// Returns `None` when the shape doesn't touch this tile at all — the
/// caller should skip the shape without logging (an off-tile shape is not
/// an error).
pub(crate) fn processing_region(mask_rect: Rect, tile: &Tile, pad: u32) -> Option<Rect> {
    let scaled = scaled_mask_rect(mask_rect, tile.scale);
    let clipped = intersect_rois(scaled, tile.rect)?;
    let padded = pad_and_clip(clipped, pad, tile.rect);
    if padded.is_empty() {
        return None;
    }
    Some(Rect::new(
        padded.x - tile.rect.x,
        padded.y - tile.rect.y,
        padded.width,
        padded.height,
    ))
}
