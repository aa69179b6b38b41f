//! The fill operator: blends a constant color, or a flat luminance in
//! erase mode, into the masked region.

use vfx_core::Rect;

use crate::rasterizer::RasterizedMask;
use crate::shape::{FillMode, ShapeRecord};
use crate::tile::Tile;

use super::{processing_region, sample_mask};

/// Runs fill over one detail band in place.
pub fn apply(band: &mut [f32], tile: &Tile, shape: &ShapeRecord, mask: &RasterizedMask, mask_rect: Rect) {
    let crate::shape::Algorithm::Fill { fill_mode, fill_color, fill_brightness } = shape.algorithm
    else {
        return;
    };

    let Some(region) = processing_region(mask_rect, tile, 0) else {
        return;
    };

    // Resolved once per shape application, not per pixel.
    let resolved = match fill_mode {
        FillMode::Color => [
            fill_color[0] + fill_brightness,
            fill_color[1] + fill_brightness,
            fill_color[2] + fill_brightness,
        ],
        FillMode::Erase => [fill_brightness, 0.0, 0.0],
    };

    let width = tile.width();
    for ly in region.y..region.bottom() {
        for lx in region.x..region.right() {
            let abs_x = tile.rect.x + lx;
            let abs_y = tile.rect.y + ly;
            let alpha = sample_mask(mask, tile, abs_x, abs_y) * shape.opacity;
            if alpha <= 0.0 {
                continue;
            }
            let idx = (ly as usize * width + lx as usize) * 4;
            for c in 0..3 {
                band[idx + c] = (1.0 - alpha) * band[idx + c] + alpha * resolved[c];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{GeometryRasterizer, ShapeRasterizer};
    use crate::shape::{Algorithm, ShapeGeometry};

    fn fill_shape(fill_mode: FillMode, fill_color: [f32; 3], fill_brightness: f32) -> ShapeRecord {
        ShapeRecord {
            form_id: 1,
            geometry: ShapeGeometry::Circle {
                cx: 10.0,
                cy: 10.0,
                radius: 4.0,
            },
            scale_index: 1,
            algorithm: Algorithm::Fill { fill_mode, fill_color, fill_brightness },
            opacity: 1.0,
            anchor: (10.0, 10.0),
            source_anchor: (10.0, 10.0),
            mask_display: false,
        }
    }

    #[test]
    fn color_mode_blends_color_plus_brightness() {
        let width = 32usize;
        let height = 32usize;
        let mut band = vec![0.0f32; width * height * 4];

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = fill_shape(FillMode::Color, [10.0, 1.0, -2.0], 5.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;

        apply(&mut band, &tile, &shape, &mask, mask_rect);

        let idx = (10 * width + 10) * 4;
        assert!((band[idx] - 15.0).abs() < 1e-3);
        assert!((band[idx + 1] - 6.0).abs() < 1e-3);
        assert!((band[idx + 2] - 3.0).abs() < 1e-3);
    }

    #[test]
    fn erase_mode_zeros_chroma() {
        let width = 32usize;
        let height = 32usize;
        let mut band = vec![7.0f32; width * height * 4];

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = fill_shape(FillMode::Erase, [1.0, 2.0, 3.0], 20.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;

        apply(&mut band, &tile, &shape, &mask, mask_rect);

        let idx = (10 * width + 10) * 4;
        assert!((band[idx] - 20.0).abs() < 1e-3);
        assert!(band[idx + 1].abs() < 1e-3);
        assert!(band[idx + 2].abs() < 1e-3);
    }
}
