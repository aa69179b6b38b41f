//! Checkerboard Gauss-Seidel solver for the discrete Laplace/Poisson
//! equation over a masked region, used to seamlessly blend a source patch
//! into a destination image (the "healing brush" algorithm).
//!
//! [`heal`] solves `Δ(dest - src) = 0` inside the mask with Dirichlet
//! boundary conditions at the mask edge, which makes the *difference*
//! between `dest` and `src` vary as smoothly as possible across the masked
//! region while matching `dest - src` exactly just outside it.

use vfx_core::AlignedBuffer;

use crate::error::{HealError, Result};

/// Blends `src` into `dest` wherever `mask` is nonzero, by solving the
/// Laplace equation for `dest - src` inside the mask.
///
/// `src`, `dest`, and `mask` must all describe the same `width x height`
/// region; `src`/`dest` carry `channels` interleaved channels per pixel,
/// `mask` carries one float per pixel (nonzero = inside the mask). If
/// `channels == 4` the fourth (alpha) channel is left untouched, matching
/// the other three-channel-only operators in this crate family.
///
/// Pixels outside the mask are left unchanged in `dest`.
pub fn heal(
    src: &[f32],
    dest: &mut [f32],
    mask: &[f32],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<()> {
    if width == 0 || height == 0 || channels == 0 {
        return Err(HealError::invalid_parameter(
            "width, height, and channels must be > 0",
        ));
    }
    let pixel_count = width * height;
    let expect = |what: &'static str, buf: &[f32], want: usize| -> Result<()> {
        if buf.len() != want {
            return Err(HealError::SizeMismatch {
                what,
                expected: want,
                got: buf.len(),
            });
        }
        Ok(())
    };
    expect("src", src, pixel_count * channels)?;
    expect("dest", dest, pixel_count * channels)?;
    expect("mask", mask, pixel_count)?;

    let zero = pixel_count * channels;
    let mut diff = AlignedBuffer::<f32>::zeroed(zero + channels)?;
    for i in 0..zero {
        diff[i] = dest[i] - src[i];
    }

    laplace_loop(diff.as_mut_slice(), width, height, channels, mask);

    for i in 0..zero {
        dest[i] = diff[i] + src[i];
    }
    Ok(())
}

/// One neighbor index per compass direction, or `zero` (the sentinel pixel)
/// when the neighbor would fall off the canvas edge.
struct System {
    adiag: Vec<f32>,
    /// Flattened `[center, east, south, west, north]` indices, 5 per masked
    /// pixel, red cells first then black cells (`nmask2` is the boundary).
    aidx: Vec<usize>,
    nmask2: usize,
    nmask: usize,
}

fn build_system(width: usize, height: usize, channels: usize, mask: &[f32]) -> System {
    let zero = width * height * channels;
    let mut adiag = Vec::new();
    let mut aidx = Vec::new();
    let mut nmask = 0usize;
    let mut nmask2 = 0usize;

    // Checkerboard ordering: a single linear pass over `aidx` first updates
    // every red cell, then every black cell, and neighbors of one color are
    // always the other color.
    for parity in 0..2usize {
        if parity == 1 {
            nmask2 = nmask;
        }
        for i in 0..height {
            let start = (i & 1) ^ parity;
            let mut j = start;
            while j < width {
                if mask[j + i * width] != 0.0 {
                    let on_left = j == 0;
                    let on_right = j == width - 1;
                    let on_top = i == 0;
                    let on_bottom = i == height - 1;

                    adiag.push(
                        4.0 - on_top as i32 as f32
                            - on_left as i32 as f32
                            - on_bottom as i32 as f32
                            - on_right as i32 as f32,
                    );

                    let index_at = |di: isize, dj: isize| -> usize {
                        let off_edge = (dj < 0 && on_left)
                            || (dj > 0 && on_right)
                            || (di < 0 && on_top)
                            || (di > 0 && on_bottom);
                        if off_edge {
                            zero
                        } else {
                            let ni = (i as isize + di) as usize;
                            let nj = (j as isize + dj) as usize;
                            (ni * width + nj) * channels
                        }
                    };

                    aidx.push(index_at(0, 0));
                    aidx.push(index_at(0, 1));
                    aidx.push(index_at(1, 0));
                    aidx.push(index_at(0, -1));
                    aidx.push(index_at(-1, 0));

                    nmask += 1;
                }
                j += 2;
            }
        }
    }

    System {
        adiag,
        aidx,
        nmask2,
        nmask,
    }
}

fn laplace_loop(pixels: &mut [f32], width: usize, height: usize, channels: usize, mask: &[f32]) {
    let system = build_system(width, height, channels, mask);
    let ch1 = if channels == 4 { 3 } else { channels };

    // Empirically tuned over-relaxation factor (benchmarked on round
    // brushes by the original healing-tool author).
    let w = (2.0 - 1.0 / (0.1575 * (system.nmask as f32).sqrt() + 0.8)) * 0.25;

    const MAX_ITER: usize = 1000;
    let epsilon = 0.1f32 / 255.0;
    let err_exit = epsilon * epsilon * w * w;

    // Each color's cells only neighbor the opposite color, so within one
    // pass every update writes a disjoint pixel; the true data dependency
    // is between the red and black passes, and across iterations.
    for _ in 0..MAX_ITER {
        let mut err = iterate(pixels, &system.adiag, &system.aidx, w, 0, system.nmask2, ch1);
        err += iterate(
            pixels,
            &system.adiag,
            &system.aidx,
            w,
            system.nmask2,
            system.nmask,
            ch1,
        );
        if err < err_exit {
            break;
        }
    }
}

fn iterate(
    pixels: &mut [f32],
    adiag: &[f32],
    aidx: &[usize],
    w: f32,
    from: usize,
    to: usize,
    ch1: usize,
) -> f32 {
    let mut err = 0.0f32;
    for i in from..to {
        let j0 = aidx[i * 5];
        let j1 = aidx[i * 5 + 1];
        let j2 = aidx[i * 5 + 2];
        let j3 = aidx[i * 5 + 3];
        let j4 = aidx[i * 5 + 4];
        let a = adiag[i];

        for k in 0..ch1 {
            let diff = w * (a * pixels[j0 + k] - (pixels[j1 + k] + pixels[j2 + k] + pixels[j3 + k] + pixels[j4 + k]));
            pixels[j0 + k] -= diff;
            err += diff * diff;
        }
    }
    err
}
