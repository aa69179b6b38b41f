//! The clone operator: blends pixels read from a source offset into the
//! destination through the shape's mask.

use crate::rasterizer::RasterizedMask;
use crate::shape::ShapeRecord;
use crate::tile::Tile;

use super::{processing_region, sample_mask};

/// Runs clone over one detail band in place.
///
/// `band` is `tile.width() * tile.height() * 4` floats; only the first
/// three channels are touched. `delta` is the destination-to-source pixel
/// offset at the tile's scale, as returned by
/// [`crate::rasterizer::ShapeRasterizer::get_delta`].
pub fn apply(
    band: &mut [f32],
    tile: &Tile,
    shape: &ShapeRecord,
    mask: &RasterizedMask,
    mask_rect: vfx_core::Rect,
    delta: (i32, i32),
) {
    let Some(region) = processing_region(mask_rect, tile, 0) else {
        return;
    };

    // Snapshot before mutating so overlapping source/destination pixels
    // read this shape's pre-edit values, not values this same pass already
    // wrote.
    let snapshot = band.to_vec();
    let width = tile.width();
    let height = tile.height();

    for ly in region.y..region.bottom() {
        for lx in region.x..region.right() {
            let abs_x = tile.rect.x + lx;
            let abs_y = tile.rect.y + ly;
            let alpha = sample_mask(mask, tile, abs_x, abs_y) * shape.opacity;
            if alpha <= 0.0 {
                continue;
            }

            let sx = lx as i32 + delta.0;
            let sy = ly as i32 + delta.1;
            if sx < 0 || sy < 0 || sx as usize >= width || sy as usize >= height {
                continue;
            }

            let dst_idx = (ly as usize * width + lx as usize) * 4;
            let src_idx = (sy as usize * width + sx as usize) * 4;
            for c in 0..3 {
                band[dst_idx + c] =
                    (1.0 - alpha) * snapshot[dst_idx + c] + alpha * snapshot[src_idx + c];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{GeometryRasterizer, ShapeRasterizer};
    use crate::shape::{Algorithm, ShapeGeometry};
    use vfx_core::Rect;

    fn flat_shape(opacity: f32) -> ShapeRecord {
        ShapeRecord {
            form_id: 1,
            geometry: ShapeGeometry::Circle {
                cx: 10.0,
                cy: 10.0,
                radius: 4.0,
            },
            scale_index: 1,
            algorithm: Algorithm::Clone,
            opacity,
            anchor: (10.0, 10.0),
            source_anchor: (20.0, 10.0),
            mask_display: false,
        }
    }

    #[test]
    fn clone_copies_source_pixels_at_full_opacity() {
        let width = 32usize;
        let height = 32usize;
        let mut band = vec![0.0f32; width * height * 4];
        // Give the source region a distinct constant value.
        for ly in 0..height {
            for lx in 16..24 {
                band[(ly * width + lx) * 4] = 99.0;
            }
        }

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = flat_shape(1.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;
        let delta = rasterizer.get_delta(&shape, tile.scale).unwrap();

        apply(&mut band, &tile, &shape, &mask, mask_rect, delta);

        let center_idx = (10 * width + 10) * 4;
        assert!((band[center_idx] - 99.0).abs() < 1e-3);
    }

    #[test]
    fn zero_opacity_leaves_band_untouched() {
        let width = 32usize;
        let height = 32usize;
        let mut band = vec![1.0f32; width * height * 4];
        let original = band.clone();

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = flat_shape(0.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;
        let delta = rasterizer.get_delta(&shape, tile.scale).unwrap();

        apply(&mut band, &tile, &shape, &mask, mask_rect, delta);
        assert_eq!(band, original);
    }
}
