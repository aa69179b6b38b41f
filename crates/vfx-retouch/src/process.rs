//! The wavelet retouch driver: decomposes a tile, dispatches each live
//! shape to its per-scale operator, then either recomposes or returns a
//! single detail scale as a levels-remapped preview.

use vfx_core::Rect;

use crate::error::{RetouchError, Result};
use crate::levels::{apply_levels, Levels};
use crate::ops;
use crate::rasterizer::ShapeRasterizer;
use crate::shape::ShapeRecord;
use crate::tile::Tile;
use crate::wavelet;

/// Everything [`retouch_process`] needs beyond the input pixels themselves.
pub struct RetouchParams<'a> {
    /// Shapes to evaluate, in original (authoring) order. Shapes on the
    /// same scale are dispatched in this order so later shapes see
    /// earlier shapes' edits ("stacking").
    pub shapes: &'a [ShapeRecord],
    /// Supplies masks, source areas, and source/destination deltas for
    /// every shape.
    pub rasterizer: &'a dyn ShapeRasterizer,
    /// Number of detail bands, `0..=15`.
    pub num_scales: usize,
    /// Shapes whose `scale_index` is at or below this value are treated
    /// as already merged into a coarser representation and are skipped,
    /// rather than edited on their own (originally-authored) scale.
    pub merge_from_scale: u32,
    /// Levels applied to the displayed scale's preview, or used as the
    /// identity pass-through transform during a full recompose.
    pub levels: Levels,
    /// `Some(k)` requests `D_k` (or the residual, when `k == num_scales +
    /// 1`) as a levels-remapped grayscale preview instead of the full
    /// recompose.
    pub display_scale: Option<u32>,
    /// When set, the mask-display overlay is computed (for a possible
    /// `auto_levels` pass) but not written into the output alpha channel.
    pub suppress_mask_display: bool,
    /// Requests a single-shot min/mean/max statistics pass over the
    /// displayed scale, reported back as a candidate levels triple.
    pub auto_levels: bool,
}

/// The result of one [`retouch_process`] call.
pub struct RetouchOutput {
    /// `width * height * 4` floats, same layout as the input tile.
    pub pixels: Vec<f32>,
    /// Present only when `params.auto_levels` was set; already passed
    /// through [`Levels::clamp_minmax`].
    pub auto_levels: Option<Levels>,
}

fn validate(tile: &Tile, input: &[f32], params: &RetouchParams) -> Result<()> {
    if params.num_scales > 15 {
        return Err(RetouchError::invalid_parameter(format!(
            "num_scales must be <= 15, got {}",
            params.num_scales
        )));
    }
    if params.merge_from_scale as usize > params.num_scales {
        return Err(RetouchError::invalid_parameter(format!(
            "merge_from_scale ({}) must be <= num_scales ({})",
            params.merge_from_scale, params.num_scales
        )));
    }
    if !params.levels.is_valid() {
        return Err(RetouchError::invalid_parameter(
            "levels triple must satisfy left < middle < right, each in [-3, 3]",
        ));
    }
    if let Some(k) = params.display_scale {
        if k as usize > params.num_scales + 1 {
            return Err(RetouchError::invalid_parameter(format!(
                "display_scale ({k}) must be <= num_scales + 1 ({})",
                params.num_scales + 1
            )));
        }
    }
    let expected = tile.buffer_len();
    if input.len() != expected {
        return Err(RetouchError::SizeMismatch {
            what: "input",
            expected,
            got: input.len(),
        });
    }
    Ok(())
}

/// Runs the decompose / per-scale edit / recompose (or preview) pipeline
/// over one tile.
///
/// Invalid parameters and buffer-size mismatches are reported to the
/// caller and the operator does not execute. An allocation failure deeper
/// in the pipeline (grid, pyramid level, or per-shape temporary) is instead
/// recovered locally: a warning is logged once and the tile is returned
/// unchanged, matching this core's "never crash, never leak a partial
/// edit" error contract.
pub fn retouch_process(tile: &Tile, input: &[f32], params: &RetouchParams) -> Result<RetouchOutput> {
    validate(tile, input, params)?;

    match run(tile, input, params) {
        Ok(output) => Ok(output),
        Err(err) if err.is_allocation_failure() => {
            log::warn!(
                "retouch_process: allocation failed ({err}), returning input tile unchanged"
            );
            Ok(RetouchOutput { pixels: input.to_vec(), auto_levels: None })
        }
        Err(err) => Err(err),
    }
}

fn run(tile: &Tile, input: &[f32], params: &RetouchParams) -> Result<RetouchOutput> {
    let width = tile.width();
    let height = tile.height();
    let full_rect = Rect::new(0, 0, width as u32, height as u32);

    let mut pyramid = wavelet::decompose(input, width, height, 4, params.num_scales);

    let mut overlay = vec![0.0f32; width * height];

    for scale in 1..=params.num_scales + 1 {
        let band = pyramid.band_mut(scale);
        for shape in params.shapes {
            if !shape.is_live_on(scale as u32) {
                continue;
            }
            if shape.scale_index <= params.merge_from_scale {
                continue;
            }
            let Some(mask) = params.rasterizer.get_mask(shape) else {
                continue;
            };
            let mask_rect = mask.rect;

            match shape.algorithm {
                crate::shape::Algorithm::Clone => {
                    let Some(delta) = params.rasterizer.get_delta(shape, tile.scale) else {
                        continue;
                    };
                    ops::clone::apply(band, tile, shape, &mask, mask_rect, delta);
                }
                crate::shape::Algorithm::Heal => {
                    let Some(delta) = params.rasterizer.get_delta(shape, tile.scale) else {
                        continue;
                    };
                    ops::heal::apply(band, tile, shape, &mask, mask_rect, delta)?;
                }
                crate::shape::Algorithm::Blur { .. } => {
                    ops::blur::apply(band, tile, shape, &mask, mask_rect)?;
                }
                crate::shape::Algorithm::Fill { .. } => {
                    ops::fill::apply(band, tile, shape, &mask, mask_rect);
                }
            }

            if shape.mask_display {
                for ly in 0..height {
                    for lx in 0..width {
                        let abs_x = tile.rect.x + lx as u32;
                        let abs_y = tile.rect.y + ly as u32;
                        let coverage = ops::sample_mask(&mask, tile, abs_x, abs_y) * shape.opacity;
                        let idx = ly * width + lx;
                        overlay[idx] = overlay[idx].max(coverage);
                    }
                }
            }
        }
    }

    let mut pixels = if let Some(k) = params.display_scale {
        preview_scale(&pyramid, k as usize, width, height, &params.levels)
    } else {
        wavelet::recompose(&pyramid, input.len())
    };

    if !params.suppress_mask_display {
        for (idx, &coverage) in overlay.iter().enumerate() {
            pixels[idx * 4 + 3] = pixels[idx * 4 + 3].max(coverage);
        }
    }

    let auto_levels = if params.auto_levels {
        Some(compute_auto_levels(&pixels, full_rect))
    } else {
        None
    };

    Ok(RetouchOutput { pixels, auto_levels })
}

fn preview_scale(
    pyramid: &wavelet::Pyramid,
    scale_index: usize,
    width: usize,
    height: usize,
    levels: &Levels,
) -> Vec<f32> {
    let band = pyramid.band(scale_index);
    let mut out = vec![0.0f32; width * height * 4];
    for (px, pixel) in band.chunks_exact(4).zip(out.chunks_exact_mut(4)) {
        pixel[0] = apply_levels(px[0], levels);
        pixel[1] = 0.0;
        pixel[2] = 0.0;
        pixel[3] = px[3];
    }
    out
}

fn compute_auto_levels(pixels: &[f32], rect: Rect) -> Levels {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    let mut sum = 0.0f64;
    let mut count = 0u64;

    for py in rect.y..rect.bottom() {
        for px in rect.x..rect.right() {
            let idx = (py as usize * rect.width as usize + px as usize) * 4;
            let lab = vfx_color::lab::srgb_to_lab([pixels[idx], pixels[idx + 1], pixels[idx + 2]]);
            let l = lab[0] / 100.0;
            min = min.min(l);
            max = max.max(l);
            sum += l as f64;
            count += 1;
        }
    }

    let mean = if count > 0 { (sum / count as f64) as f32 } else { 0.0 };
    Levels::new(min, mean, max).clamp_minmax()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::GeometryRasterizer;
    use crate::shape::{Algorithm, FillMode, ShapeGeometry};

    #[test]
    fn allocation_failure_is_the_only_recoverable_variant() {
        let alloc = RetouchError::AllocationFailed(vfx_core::Error::allocation_failed(
            16,
            "out of memory",
        ));
        assert!(alloc.is_allocation_failure());

        let bilateral_alloc = RetouchError::BilateralFailed(
            vfx_bilateral::BilateralError::AllocationFailed(vfx_core::Error::allocation_failed(
                16,
                "out of memory",
            )),
        );
        assert!(bilateral_alloc.is_allocation_failure());

        let invalid = RetouchError::invalid_parameter("bad num_scales");
        assert!(!invalid.is_allocation_failure());

        let size = RetouchError::SizeMismatch { what: "input", expected: 4, got: 3 };
        assert!(!size.is_allocation_failure());
    }

    #[test]
    fn empty_shape_list_reconstructs_input() {
        let width = 24usize;
        let height = 24usize;
        let mut input = vec![0.0f32; width * height * 4];
        let mut seed = 777u32;
        for v in input.iter_mut() {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            *v = ((seed >> 8) & 0xff) as f32 / 255.0 * 100.0;
        }

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let rasterizer = GeometryRasterizer::default();
        let params = RetouchParams {
            shapes: &[],
            rasterizer: &rasterizer,
            num_scales: 3,
            merge_from_scale: 0,
            levels: Levels::default(),
            display_scale: None,
            suppress_mask_display: false,
            auto_levels: false,
        };

        let output = retouch_process(&tile, &input, &params).unwrap();
        let max_err = input
            .iter()
            .zip(output.pixels.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-3, "max_err = {max_err}");
    }

    #[test]
    fn constant_fill_shape_changes_only_masked_pixels() {
        let width = 64usize;
        let height = 64usize;
        let input = vec![20.0f32, 0.0, 0.0, 0.0]
            .iter()
            .cycle()
            .take(width * height * 4)
            .copied()
            .collect::<Vec<_>>();

        let shape = ShapeRecord {
            form_id: 1,
            geometry: ShapeGeometry::Circle { cx: 32.0, cy: 32.0, radius: 10.0 },
            scale_index: 1,
            algorithm: Algorithm::Fill {
                fill_mode: FillMode::Color,
                fill_color: [80.0, 0.0, 0.0],
                fill_brightness: 0.0,
            },
            opacity: 1.0,
            anchor: (32.0, 32.0),
            source_anchor: (32.0, 32.0),
            mask_display: false,
        };

        let tile = Tile::new(Rect::new(0, 0, width as u32, height as u32), 1.0);
        let rasterizer = GeometryRasterizer::hard_edge();
        let params = RetouchParams {
            shapes: std::slice::from_ref(&shape),
            rasterizer: &rasterizer,
            num_scales: 0,
            merge_from_scale: 0,
            levels: Levels::default(),
            display_scale: None,
            suppress_mask_display: false,
            auto_levels: false,
        };

        let output = retouch_process(&tile, &input, &params).unwrap();
        let center_idx = (32 * width + 32) * 4;
        let corner_idx = 0;
        assert!((output.pixels[center_idx] - 80.0).abs() < 1e-2);
        assert!((output.pixels[corner_idx] - 20.0).abs() < 1e-2);
    }
}
