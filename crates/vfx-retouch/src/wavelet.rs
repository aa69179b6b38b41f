//! À-trous (undecimated) wavelet decomposition.
//!
//! Each level's low-pass approximation is formed by convolving the
//! previous level with a `[1 4 6 4 1]/16` binomial kernel dilated by
//! inserting `2^(s-1) - 1` zero taps between coefficients ("holes"), so
//! successive levels capture coarser spatial frequencies without ever
//! downsampling the buffer. Mirrors at the tile boundary.

use rayon::prelude::*;

const TAPS: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Reflects an out-of-range index back into `0..n` without repeating the
/// edge pixel (`reflect_101`): `-1` maps to `1`, `n` maps to `n - 2`.
///
/// Folds indices that overshoot by more than one period, which matters at
/// high wavelet scales where the dilated kernel's support can exceed the
/// tile dimension several times over.
#[inline]
pub fn mirror_index(idx: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let mut m = idx % period;
    if m < 0 {
        m += period;
    }
    if m >= n as isize {
        m = period - m;
    }
    m as usize
}

/// One separable pass of the dilated binomial kernel along the rows of a
/// row-major buffer of `line_count` lines, each `line_len` pixels of
/// `channels` floats. Run once directly for the horizontal pass and once
/// on a transposed copy for the vertical pass.
fn lowpass_axis(
    src: &[f32],
    dst: &mut [f32],
    channels: usize,
    line_len: usize,
    hole: usize,
) {
    let hole = hole as isize;
    dst.par_chunks_mut(line_len * channels)
        .enumerate()
        .for_each(|(line, out)| {
            let row_base = line * line_len * channels;
            for pos in 0..line_len {
                for c in 0..channels {
                    let mut acc = 0.0f32;
                    for (k, w) in TAPS.iter().enumerate() {
                        let tap_offset = (k as isize - 2) * hole;
                        let sample_pos = mirror_index(pos as isize + tap_offset, line_len);
                        acc += w * src[row_base + sample_pos * channels + c];
                    }
                    out[pos * channels + c] = acc;
                }
            }
        });
}

/// Runs the dilated low-pass over both axes of a row-major image buffer.
fn lowpass(
    src: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    hole: usize,
) -> Vec<f32> {
    let mut horiz = vec![0.0f32; src.len()];
    lowpass_axis(src, &mut horiz, channels, width, hole);

    // Transpose so the vertical pass can reuse the same row-convolution
    // routine, then transpose back.
    let transposed = transpose(&horiz, width, height, channels);
    let mut v_blurred = vec![0.0f32; transposed.len()];
    lowpass_axis(&transposed, &mut v_blurred, channels, height, hole);
    transpose(&v_blurred, height, width, channels)
}

fn transpose(src: &[f32], width: usize, height: usize, channels: usize) -> Vec<f32> {
    let mut dst = vec![0.0f32; src.len()];
    dst.par_chunks_mut(height * channels)
        .enumerate()
        .for_each(|(x, col)| {
            for y in 0..height {
                let src_idx = (y * width + x) * channels;
                let dst_idx = y * channels;
                for c in 0..channels {
                    col[dst_idx + c] = src[src_idx + c];
                }
            }
        });
    dst
}

/// A decomposed wavelet pyramid: `num_scales` detail bands plus one coarse
/// residual, each the size of the input buffer.
///
/// `bands[0..num_scales]` are the detail layers `D_1..D_N` (finest first);
/// `bands[num_scales]` is the residual. Summing every band reproduces the
/// input within float rounding (see [`recompose`]).
#[derive(Debug, Clone)]
pub struct Pyramid {
    /// Detail bands followed by the coarse residual; length `num_scales + 1`.
    pub bands: Vec<Vec<f32>>,
    /// Number of detail bands (excluding the residual).
    pub num_scales: usize,
}

impl Pyramid {
    /// Returns the detail band `D_s` for `s` in `1..=num_scales`.
    pub fn detail(&self, s: usize) -> &[f32] {
        &self.bands[s - 1]
    }

    /// Mutable access to detail band `D_s`.
    pub fn detail_mut(&mut self, s: usize) -> &mut [f32] {
        &mut self.bands[s - 1]
    }

    /// The coarse residual, logically scale `num_scales + 1`.
    pub fn residual(&self) -> &[f32] {
        &self.bands[self.num_scales]
    }

    /// Mutable access to the coarse residual.
    pub fn residual_mut(&mut self) -> &mut [f32] {
        &mut self.bands[self.num_scales]
    }

    /// Accesses band at logical scale index `1..=num_scales + 1`.
    pub fn band(&self, scale_index: usize) -> &[f32] {
        &self.bands[scale_index - 1]
    }

    /// Mutable access to band at logical scale index `1..=num_scales + 1`.
    pub fn band_mut(&mut self, scale_index: usize) -> &mut [f32] {
        &mut self.bands[scale_index - 1]
    }
}

/// Decomposes `input` into `num_scales` detail bands plus a residual.
///
/// `num_scales == 0` returns a pyramid containing only the residual, which
/// is then just a copy of `input` (no filtering is applied).
pub fn decompose(
    input: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    num_scales: usize,
) -> Pyramid {
    let mut bands = Vec::with_capacity(num_scales + 1);
    let mut low = input.to_vec();

    for s in 1..=num_scales {
        let hole = 1usize << (s - 1);
        let blurred = lowpass(&low, width, height, channels, hole);
        let mut detail = vec![0.0f32; low.len()];
        for ((d, l), b) in detail.iter_mut().zip(low.iter()).zip(blurred.iter()) {
            *d = l - b;
        }
        bands.push(detail);
        low = blurred;
    }
    bands.push(low);

    Pyramid { bands, num_scales }
}

/// Sums every band of the pyramid back into a single buffer.
///
/// With no per-scale edits this reproduces the original input (within
/// float rounding); edited bands contribute their edited values instead.
pub fn recompose(pyramid: &Pyramid, len: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; len];
    for band in &pyramid.bands {
        for (o, b) in out.iter_mut().zip(band.iter()) {
            *o += b;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_index_reflects_without_repeating_edge() {
        assert_eq!(mirror_index(-1, 10), 1);
        assert_eq!(mirror_index(-2, 10), 2);
        assert_eq!(mirror_index(10, 10), 8);
        assert_eq!(mirror_index(0, 10), 0);
        assert_eq!(mirror_index(9, 10), 9);
    }

    #[test]
    fn mirror_index_folds_far_overshoot() {
        // period for n=4 is 6; index 100 should still land in [0, 4).
        let idx = mirror_index(100, 4);
        assert!(idx < 4);
    }

    #[test]
    fn perfect_reconstruction_on_random_tile() {
        let width = 16;
        let height = 16;
        let channels = 4;
        let mut input = vec![0.0f32; width * height * channels];
        let mut seed = 12345u32;
        for v in input.iter_mut() {
            seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
            *v = ((seed >> 8) & 0xff) as f32 / 255.0 * 100.0;
        }

        let pyramid = decompose(&input, width, height, channels, 4);
        let out = recompose(&pyramid, input.len());

        let max_err = input
            .iter()
            .zip(out.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_err < 1e-3, "max_err = {max_err}");
    }

    #[test]
    fn constant_image_has_zero_detail() {
        let width = 8;
        let height = 8;
        let channels = 4;
        let input = vec![42.0f32; width * height * channels];

        let pyramid = decompose(&input, width, height, channels, 3);
        for s in 1..=3 {
            let band = pyramid.detail(s);
            for v in band {
                assert!(v.abs() < 1e-4);
            }
        }
        for v in pyramid.residual() {
            assert!((v - 42.0).abs() < 1e-3);
        }
    }
}
