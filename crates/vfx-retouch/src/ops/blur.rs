//! The blur operator: either a reflect-boundary separable Gaussian or the
//! bilateral grid, run over the masked region and blended back through
//! mask times opacity.

use vfx_core::Rect;

use crate::rasterizer::RasterizedMask;
use crate::shape::{BlurType, ShapeRecord};
use crate::tile::Tile;
use crate::wavelet::mirror_index;

use super::{processing_region, sample_mask};

/// Runs the blur operator (Gaussian or bilateral, per `shape.algorithm`)
/// over one detail band in place.
pub fn apply(
    band: &mut [f32],
    tile: &Tile,
    shape: &ShapeRecord,
    mask: &RasterizedMask,
    mask_rect: Rect,
) -> crate::error::Result<()> {
    let crate::shape::Algorithm::Blur { blur_type, blur_radius } = shape.algorithm else {
        return Ok(());
    };

    let Some(region) = processing_region(mask_rect, tile, 0) else {
        return Ok(());
    };
    let rw = region.width as usize;
    let rh = region.height as usize;
    if rw == 0 || rh == 0 {
        return Ok(());
    }

    let width = tile.width();

    let mut patch = vec![0.0f32; rw * rh * 4];
    for ry in 0..rh {
        for rx in 0..rw {
            let lx = region.x + rx as u32;
            let ly = region.y + ry as u32;
            let src_idx = (ly as usize * width + lx as usize) * 4;
            let dst_idx = (ry * rw + rx) * 4;
            patch[dst_idx..dst_idx + 4].copy_from_slice(&band[src_idx..src_idx + 4]);
        }
    }

    let blurred = match blur_type {
        BlurType::Gaussian => gaussian_blur(&patch, rw, rh, blur_radius * tile.scale),
        BlurType::Bilateral => bilateral_blur(&patch, rw, rh, blur_radius)?,
    };

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
            let patch_idx = (ry * rw + rx) * 4;
            for c in 0..3 {
                band[dst_idx + c] =
                    (1.0 - alpha) * band[dst_idx + c] + alpha * blurred[patch_idx + c];
            }
        }
    }

    Ok(())
}

/// A separable Gaussian with reflecting (mirror-at-boundary) edges, over
/// the first three channels of a `width x height` 4-channel patch.
fn gaussian_blur(patch: &[f32], width: usize, height: usize, sigma: f32) -> Vec<f32> {
    let sigma = sigma.max(1e-3);
    let radius = (sigma * 3.0).ceil().max(1.0) as isize;
    let mut weights = Vec::with_capacity((2 * radius + 1) as usize);
    let mut sum = 0.0f32;
    for k in -radius..=radius {
        let w = (-0.5 * (k as f32 / sigma).powi(2)).exp();
        weights.push(w);
        sum += w;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }

    let mut horiz = patch.to_vec();
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &w) in weights.iter().enumerate() {
                let offset = k as isize - radius;
                let sx = mirror_index(x as isize + offset, width);
                let idx = (y * width + sx) * 4;
                for c in 0..3 {
                    acc[c] += w * patch[idx + c];
                }
            }
            let idx = (y * width + x) * 4;
            horiz[idx..idx + 3].copy_from_slice(&acc);
        }
    }

    let mut out = horiz.clone();
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (k, &w) in weights.iter().enumerate() {
                let offset = k as isize - radius;
                let sy = mirror_index(y as isize + offset, height);
                let idx = (sy * width + x) * 4;
                for c in 0..3 {
                    acc[c] += w * horiz[idx + c];
                }
            }
            let idx = (y * width + x) * 4;
            out[idx..idx + 3].copy_from_slice(&acc);
        }
    }
    out
}

/// Converts the patch's first three channels to Lab, runs the bilateral
/// grid over the L channel, and converts back.
///
/// The grid's splat/slice only ever read and write channel 0, so `a`/`b`
/// pass through the grid as the "extra" channels it copies unchanged.
fn bilateral_blur(patch: &[f32], width: usize, height: usize, radius: f32) -> crate::error::Result<Vec<f32>> {
    let mut lab = vec![0.0f32; patch.len()];
    for (src, dst) in patch.chunks_exact(4).zip(lab.chunks_exact_mut(4)) {
        let l = vfx_color::lab::srgb_to_lab([src[0], src[1], src[2]]);
        dst[0] = l[0];
        dst[1] = l[1];
        dst[2] = l[2];
        dst[3] = src[3];
    }

    let mut grid = vfx_bilateral::BilateralGrid::init(width, height, radius.max(1e-3), 100.0)?;
    grid.splat(&lab)?;
    grid.blur();
    let mut sliced = vec![0.0f32; lab.len()];
    grid.slice(&lab, &mut sliced, -1.0)?;

    let mut out = patch.to_vec();
    for (src, dst) in sliced.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        let rgb = vfx_color::lab::lab_to_srgb([src[0], src[1], src[2]]);
        dst[0] = rgb[0];
        dst[1] = rgb[1];
        dst[2] = rgb[2];
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::{GeometryRasterizer, ShapeRasterizer};
    use crate::shape::{Algorithm, ShapeGeometry};

    fn blur_shape(blur_type: BlurType, blur_radius: f32) -> ShapeRecord {
        ShapeRecord {
            form_id: 1,
            geometry: ShapeGeometry::Circle {
                cx: 16.0,
                cy: 16.0,
                radius: 6.0,
            },
            scale_index: 1,
            algorithm: Algorithm::Blur { blur_type, blur_radius },
            opacity: 1.0,
            anchor: (16.0, 16.0),
            source_anchor: (16.0, 16.0),
            mask_display: false,
        }
    }

    #[test]
    fn gaussian_blur_smooths_a_single_spike() {
        let width = 32usize;
        let height = 32usize;
        let mut band = vec![0.0f32; width * height * 4];
        band[(16 * width + 16) * 4] = 100.0;

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = blur_shape(BlurType::Gaussian, 3.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;

        apply(&mut band, &tile, &shape, &mask, mask_rect).unwrap();

        let center_idx = (16 * width + 16) * 4;
        assert!(band[center_idx] < 100.0);
        assert!(band[center_idx] > 0.0);
    }

    #[test]
    fn mirror_boundary_avoids_darkening_edges() {
        let width = 16usize;
        let height = 16usize;
        let band = vec![50.0f32; width * height * 4];
        let mut band = band;

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let shape = blur_shape(BlurType::Gaussian, 2.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let mask = rasterizer.get_mask(&shape).unwrap();
        let mask_rect = mask.rect;

        apply(&mut band, &tile, &shape, &mask, mask_rect).unwrap();

        // A constant field should stay constant regardless of boundary
        // handling.
        for v in &band {
            assert!((v - 50.0).abs() < 1e-2 || *v == 0.0);
        }
    }
}
