//! The heal operator: like clone, but the source/destination patches are
//! fed through [`vfx_heal::heal`] before blending, so the seam between
//! them vanishes rather than just being cross-faded.

use vfx_core::Rect;

use crate::rasterizer::RasterizedMask;
use crate::shape::ShapeRecord;
use crate::tile::Tile;

use super::{processing_region, sample_mask};

/// Runs heal over one detail band in place.
///
/// Pads the processing region by one pixel so the solver has a well-defined
/// Dirichlet boundary, per [`crate::rect_ops::pad_and_clip`]'s contract.
pub fn apply(
    band: &mut [f32],
    tile: &Tile,
    shape: &ShapeRecord,
    mask: &RasterizedMask,
    mask_rect: Rect,
    delta: (i32, i32),
) -> crate::error::Result<()> {
    let Some(region) = processing_region(mask_rect, tile, 1) else {
        return Ok(());
    };
    let rw = region.width as usize;
    let rh = region.height as usize;
    if rw == 0 || rh == 0 {
        return Ok(());
    }

    let width = tile.width();
    let height = tile.height();

    let mut src_patch = vec![0.0f32; rw * rh * 3];
    let mut dst_patch = vec![0.0f32; rw * rh * 3];
    let mut mask_patch = vec![0.0f32; rw * rh];

    for ry in 0..rh {
        for rx in 0..rw {
            let lx = region.x + rx as u32;
            let ly = region.y + ry as u32;
            let dst_idx = (ly as usize * width + lx as usize) * 4;
            let patch_idx = (ry * rw + rx) * 3;
            for c in 0..3 {
                dst_patch[patch_idx + c] = band[dst_idx + c];
            }

            let sx = lx as i32 + delta.0;
            let sy = ly as i32 + delta.1;
            if sx < 0 || sy < 0 || sx as usize >= width || sy as usize >= height {
                // No source pixel here: exclude from the solve entirely by
                // leaving mask_patch at 0 and mirroring dest into src so the
                // (unused) difference is zero.
                for c in 0..3 {
                    src_patch[patch_idx + c] = dst_patch[patch_idx + c];
                }
                continue;
            }
            let src_idx = (sy as usize * width + sx as usize) * 4;
            for c in 0..3 {
                src_patch[patch_idx + c] = band[src_idx + c];
            }

            let abs_x = tile.rect.x + lx;
            let abs_y = tile.rect.y + ly;
            mask_patch[ry * rw + rx] = sample_mask(mask, tile, abs_x, abs_y);
        }
    }

    let original_dst = dst_patch.clone();
    vfx_heal::heal(&src_patch, &mut dst_patch, &mask_patch, rw, rh, 3)?;

    for ry in 0..rh {
        for rx in 0..rw {
            let lx = region.x + rx as u32;
            let ly = region.y + ry as u32;
            let abs_x = tile.rect.x + lx;
            let abs_y = tile.rect.y + ly;
            let alpha = sample_mask(mask, tile, abs_x, abs_y) * shape.opacity;
            if alpha <= 0.0 {
                continue;
            }
            let dst_idx = (ly as usize * width + lx as usize) * 4;
            let patch_idx = (ry * rw + rx) * 3;
            for c in 0..3 {
                band[dst_idx + c] =
                    (1.0 - alpha) * original_dst[patch_idx + c] + alpha * dst_patch[patch_idx + c];
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{GeometryRasterizer, ShapeRasterizer};
    use crate::shape::{Algorithm, ShapeGeometry};

    fn flat_shape() -> ShapeRecord {
        ShapeRecord {
            form_id: 1,
            geometry: ShapeGeometry::Circle {
                cx: 16.0,
                cy: 16.0,
                radius: 4.0,
            },
            scale_index: 1,
            algorithm: Algorithm::Heal,
            opacity: 1.0,
            anchor: (16.0, 16.0),
            source_anchor: (28.0, 16.0),
            mask_display: false,
        }
    }

    #[test]
    fn heal_leaves_band_unchanged_outside_mask() {
        let width = 40usize;
        let height = 40usize;
        let mut band = vec![0.5f32; width * height * 4];
        let original = band.clone();

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = flat_shape();
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;
        let delta = rasterizer.get_delta(&shape, tile.scale).unwrap();

        apply(&mut band, &tile, &shape, &mask, mask_rect, delta).unwrap();

        let far_idx = (2 * width + 2) * 4;
        assert!((band[far_idx] - original[far_idx]).abs() < 1e-6);
    }

    #[test]
    fn heal_smooths_a_step_discontinuity() {
        let width = 48usize;
        let height = 48usize;
        let mut band = vec![0.0f32; width * height * 4];
        for ly in 0..height {
            for lx in 0..width {
                let idx = (ly * width + lx) * 4;
                band[idx] = if lx < width / 2 { 0.0 } else { 1.0 };
            }
        }

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = flat_shape();
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;
        let delta = rasterizer.get_delta(&shape, tile.scale).unwrap();

        apply(&mut band, &tile, &shape, &mask, mask_rect, delta).unwrap();

        // Inside the healed disc, the value should no longer be a hard 0/1
        // step but something blended between the two sides.
        let center_idx = (16 * width + 16) * 4;
        assert!(band[center_idx] > 0.0 && band[center_idx] < 1.0);
    }
}
