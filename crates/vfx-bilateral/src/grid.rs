//! The bilateral grid: a downsampled `(x, y, luma)` histogram grid used to
//! approximate edge-aware smoothing in near-constant time per pixel.
//!
//! The grid is built in three steps: [`BilateralGrid::splat`] distributes
//! each pixel's weight into its eight neighboring grid cells, [`blur`]
//! smooths the grid along all three axes, and [`slice`]/[`slice_to_output`]
//! resample it back at full resolution. Between `splat` and `blur` the grid
//! holds a weighted histogram; after `blur` it holds a smoothed signal ready
//! to be sampled.

use rayon::prelude::*;
use vfx_core::AlignedBuffer;

use crate::error::{BilateralError, Result};

/// Resolution clamps. Chosen so that memory use stays bounded regardless of
/// input size or extreme sigma values; tiling absorbs the rest.
const MAX_RES_SPATIAL: i64 = 6000;
const MAX_RES_RANGE: i64 = 50;

fn clamp_round(value: f32, lo: i64, hi: i64) -> usize {
    (value.round() as i64).clamp(lo, hi) as usize
}

/// A 3-D `(x, y, luma)` grid used for bilateral filtering.
///
/// Grid dimensions are derived from the input image size and the requested
/// sigmas, then clamped to bounded resolutions; the *effective* sigmas
/// (`sigma_s`, `sigma_r`) are recomputed from the clamped grid size so the
/// grid spacing matches exactly what `splat`/`slice` assume.
pub struct BilateralGrid {
    buf: AlignedBuffer<f32>,
    size_x: usize,
    size_y: usize,
    size_z: usize,
    width: usize,
    height: usize,
    sigma_s: f32,
    sigma_r: f32,
}

fn grid_dims(width: usize, height: usize, sigma_s: f32, sigma_r: f32) -> (usize, usize, usize) {
    let size_x = clamp_round(width as f32 / sigma_s, 4, MAX_RES_SPATIAL) + 1;
    let size_y = clamp_round(height as f32 / sigma_s, 4, MAX_RES_SPATIAL) + 1;
    let size_z = clamp_round(100.0 / sigma_r, 4, MAX_RES_RANGE) + 1;
    (size_x, size_y, size_z)
}

/// Total bytes a grid for an image of this size and these sigmas would use.
///
/// Lets a caller size tiles before actually allocating the grid (see
/// `vfx_retouch::tiling`).
pub fn memory_use(width: usize, height: usize, sigma_s: f32, sigma_r: f32) -> usize {
    let (sx, sy, sz) = grid_dims(width, height, sigma_s, sigma_r);
    sx * sy * sz * std::mem::size_of::<f32>()
}

/// Alias of [`memory_use`]; the CPU path needs no additional scratch buffer
/// beyond the grid itself.
pub fn singlebuffer_size(width: usize, height: usize, sigma_s: f32, sigma_r: f32) -> usize {
    memory_use(width, height, sigma_s, sigma_r)
}

impl BilateralGrid {
    /// Allocates a zeroed grid sized for a `width x height` image and the
    /// requested spatial/range sigmas.
    ///
    /// The sigmas actually used ([`BilateralGrid::sigma_s`],
    /// [`BilateralGrid::sigma_r`]) are recomputed from the clamped grid
    /// dimensions and may differ slightly from the requested values.
    pub fn init(width: usize, height: usize, sigma_s: f32, sigma_r: f32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BilateralError::invalid_parameter(
                "width and height must be > 0",
            ));
        }
        if !(sigma_s.is_finite() && sigma_s > 0.0) || !(sigma_r.is_finite() && sigma_r > 0.0) {
            return Err(BilateralError::invalid_parameter(
                "sigma_s and sigma_r must be finite and > 0",
            ));
        }

        let (size_x, size_y, size_z) = grid_dims(width, height, sigma_s, sigma_r);
        let eff_sigma_s = (height as f32 / (size_y - 1) as f32).max(width as f32 / (size_x - 1) as f32);
        let eff_sigma_r = 100.0 / (size_z - 1) as f32;

        let buf = AlignedBuffer::zeroed(size_x * size_y * size_z)?;

        Ok(Self {
            buf,
            size_x,
            size_y,
            size_z,
            width,
            height,
            sigma_s: eff_sigma_s,
            sigma_r: eff_sigma_r,
        })
    }

    /// Grid size along x (downsampled pixel columns).
    pub fn size_x(&self) -> usize {
        self.size_x
    }

    /// Grid size along y (downsampled pixel rows).
    pub fn size_y(&self) -> usize {
        self.size_y
    }

    /// Grid size along z (downsampled luma bins).
    pub fn size_z(&self) -> usize {
        self.size_z
    }

    /// Effective spatial sigma after clamping (pixels per grid cell).
    pub fn sigma_s(&self) -> f32 {
        self.sigma_s
    }

    /// Effective range sigma after clamping (luma units per grid cell).
    pub fn sigma_r(&self) -> f32 {
        self.sigma_r
    }

    /// Bytes the grid buffer occupies.
    pub fn memory_use(&self) -> usize {
        self.buf.len() * std::mem::size_of::<f32>()
    }

    fn expect_image_len(&self, len: usize) -> Result<()> {
        let expected = self.width * self.height * 4;
        if len != expected {
            return Err(BilateralError::SizeMismatch {
                expected,
                got: len,
            });
        }
        Ok(())
    }

    fn to_grid_coords(&self, i: usize, j: usize, l: f32) -> (f32, f32, f32) {
        let x = (i as f32 / self.sigma_s).clamp(0.0, (self.size_x - 1) as f32);
        let y = (j as f32 / self.sigma_s).clamp(0.0, (self.size_y - 1) as f32);
        let z = (l / self.sigma_r).clamp(0.0, (self.size_z - 1) as f32);
        (x, y, z)
    }

    /// Splats the first channel of each pixel (`in[4*idx]`, e.g. luminance)
    /// into the grid's eight nearest cells with trilinear weights.
    ///
    /// `input` carries `width * height` pixels of 4 channels each,
    /// row-major; only channel 0 is read. Multiple image rows can map to
    /// the same downsampled grid row, so contributions are accumulated
    /// through per-task shadow grids reduced by summation rather than
    /// atomics.
    pub fn splat(&mut self, input: &[f32]) -> Result<()> {
        self.expect_image_len(input.len())?;

        let (size_x, size_y, size_z) = (self.size_x, self.size_y, self.size_z);
        let grid_len = size_x * size_y * size_z;
        let (ox, oy, oz) = (1usize, size_x, size_x * size_y);
        let (sigma_s, sigma_r) = (self.sigma_s, self.sigma_r);
        let width = self.width;

        let accum = (0..self.height)
            .into_par_iter()
            .fold(
                || vec![0.0f32; grid_len],
                |mut local, j| {
                    let mut index = 4 * j * width;
                    for i in 0..width {
                        let l = input[index];
                        let x = (i as f32 / sigma_s).clamp(0.0, (size_x - 1) as f32);
                        let y = (j as f32 / sigma_s).clamp(0.0, (size_y - 1) as f32);
                        let z = (l / sigma_r).clamp(0.0, (size_z - 1) as f32);

                        let xi = (x as usize).min(size_x - 2);
                        let yi = (y as usize).min(size_y - 2);
                        let zi = (z as usize).min(size_z - 2);
                        let xf = x - xi as f32;
                        let yf = y - yi as f32;
                        let zf = z - zi as f32;
                        let grid_index = xi + size_x * (yi + size_y * zi);

                        for k in 0..8usize {
                            let ii = grid_index
                                + if k & 1 != 0 { ox } else { 0 }
                                + if k & 2 != 0 { oy } else { 0 }
                                + if k & 4 != 0 { oz } else { 0 };
                            let contrib = (if k & 1 != 0 { xf } else { 1.0 - xf })
                                * (if k & 2 != 0 { yf } else { 1.0 - yf })
                                * (if k & 4 != 0 { zf } else { 1.0 - zf })
                                * 100.0
                                / (sigma_s * sigma_s);
                            local[ii] += contrib;
                        }
                        index += 4;
                    }
                    local
                },
            )
            .reduce(
                || vec![0.0f32; grid_len],
                |mut a, b| {
                    for (av, bv) in a.iter_mut().zip(b.iter()) {
                        *av += bv;
                    }
                    a
                },
            );

        for (dst, src) in self.buf.as_mut_slice().iter_mut().zip(accum.iter()) {
            *dst += src;
        }
        Ok(())
    }

    /// Separable 3-axis blur of the grid: a binomial `[1 4 6 4 1]/16`
    /// low-pass along x and y, and a derivative-of-Gaussian `[-2 -4 0 4 2]/16`
    /// along z (range/luma axis).
    pub fn blur(&mut self) {
        let (sx, sy, sz) = (self.size_x, self.size_y, self.size_z);
        let plane = sx * sy;
        let buf = self.buf.as_mut_slice();

        buf.par_chunks_mut(plane).for_each(|chunk| {
            blur_line_inchunk(chunk, sx, 1, sy, sx);
        });
        buf.par_chunks_mut(plane).for_each(|chunk| {
            blur_line_inchunk(chunk, 1, sx, sx, sy);
        });
        blur_z_axis(buf, sx, sy, sz);
    }

    /// Resamples the blurred grid back to full resolution and writes the
    /// result into `out`, copying the non-luma channels through unchanged.
    ///
    /// `detail` interpolates between leaving the channel unchanged (`0.0`),
    /// fully bilateral-filtered (`-1.0`), and boosted local contrast
    /// (positive values).
    pub fn slice(&self, input: &[f32], output: &mut [f32], detail: f32) -> Result<()> {
        self.expect_image_len(input.len())?;
        self.expect_image_len(output.len())?;

        let norm = -detail * self.sigma_r * 0.04;
        let (sx, sy) = (self.size_x, self.size_y);
        let (ox, oy, oz) = (1usize, sx, sx * sy);

        output
            .par_chunks_mut(4 * self.width)
            .enumerate()
            .for_each(|(j, out_row)| {
                let mut index = 0usize;
                for i in 0..self.width {
                    let src = 4 * j * self.width + index;
                    let l = input[src];
                    let (x, y, z) = self.to_grid_coords(i, j, l);
                    let xi = (x as usize).min(sx - 2);
                    let yi = (y as usize).min(sy - 2);
                    let zi = (z as usize).min(self.size_z - 2);
                    let xf = x - xi as f32;
                    let yf = y - yi as f32;
                    let zf = z - zi as f32;
                    let gi = xi + sx * (yi + sy * zi);
                    let b = self.buf.as_slice();
                    let sample = b[gi] * (1.0 - xf) * (1.0 - yf) * (1.0 - zf)
                        + b[gi + ox] * xf * (1.0 - yf) * (1.0 - zf)
                        + b[gi + oy] * (1.0 - xf) * yf * (1.0 - zf)
                        + b[gi + ox + oy] * xf * yf * (1.0 - zf)
                        + b[gi + oz] * (1.0 - xf) * (1.0 - yf) * zf
                        + b[gi + ox + oz] * xf * (1.0 - yf) * zf
                        + b[gi + oy + oz] * (1.0 - xf) * yf * zf
                        + b[gi + ox + oy + oz] * xf * yf * zf;

                    out_row[index] = l + norm * sample;
                    out_row[index + 1] = input[src + 1];
                    out_row[index + 2] = input[src + 2];
                    out_row[index + 3] = input[src + 3];
                    index += 4;
                }
            });
        Ok(())
    }

    /// Like [`BilateralGrid::slice`], but adds the filtered detail signal
    /// onto whatever is already in `output[4*idx]` (clamped to `>= 0`)
    /// instead of replacing it and copying the other channels through.
    pub fn slice_to_output(&self, input: &[f32], output: &mut [f32], detail: f32) -> Result<()> {
        self.expect_image_len(input.len())?;
        self.expect_image_len(output.len())?;

        let norm = -detail * self.sigma_r * 0.04;
        let (sx, sy) = (self.size_x, self.size_y);
        let (ox, oy, oz) = (1usize, sx, sx * sy);

        output
            .par_chunks_mut(4 * self.width)
            .enumerate()
            .for_each(|(j, out_row)| {
                let mut index = 0usize;
                for i in 0..self.width {
                    let src = 4 * j * self.width + index;
                    let l = input[src];
                    let (x, y, z) = self.to_grid_coords(i, j, l);
                    let xi = (x as usize).min(sx - 2);
                    let yi = (y as usize).min(sy - 2);
                    let zi = (z as usize).min(self.size_z - 2);
                    let xf = x - xi as f32;
                    let yf = y - yi as f32;
                    let zf = z - zi as f32;
                    let gi = xi + sx * (yi + sy * zi);
                    let b = self.buf.as_slice();
                    let sample = b[gi] * (1.0 - xf) * (1.0 - yf) * (1.0 - zf)
                        + b[gi + ox] * xf * (1.0 - yf) * (1.0 - zf)
                        + b[gi + oy] * (1.0 - xf) * yf * (1.0 - zf)
                        + b[gi + ox + oy] * xf * yf * (1.0 - zf)
                        + b[gi + oz] * (1.0 - xf) * (1.0 - yf) * zf
                        + b[gi + ox + oz] * xf * (1.0 - yf) * zf
                        + b[gi + oy + oz] * (1.0 - xf) * yf * zf
                        + b[gi + ox + oy + oz] * xf * yf * zf;

                    out_row[index] = (out_row[index] + norm * sample).max(0.0);
                    index += 4;
                }
            });
        Ok(())
    }
}

/// In-place `[1 4 6 4 1]/16` separable blur of every `size2 x size3` line
/// starting at index 0 within `buf`, matching a single "plane" of the
/// original triple-nested stencil (the outer `size1` loop is handled by the
/// caller splitting the grid into parallel chunks beforehand).
fn blur_line_inchunk(buf: &mut [f32], offset2: usize, offset3: usize, size2: usize, size3: usize) {
    const W0: f32 = 6.0 / 16.0;
    const W1: f32 = 4.0 / 16.0;
    const W2: f32 = 1.0 / 16.0;

    for j in 0..size2 {
        let mut index = j * offset2;
        let mut tmp1 = buf[index];
        buf[index] = buf[index] * W0 + W1 * buf[index + offset3] + W2 * buf[index + 2 * offset3];
        index += offset3;
        let mut tmp2 = buf[index];
        buf[index] = buf[index] * W0 + W1 * (buf[index + offset3] + tmp1) + W2 * buf[index + 2 * offset3];
        index += offset3;
        for _ in 2..size3 - 2 {
            let tmp3 = buf[index];
            buf[index] =
                buf[index] * W0 + W1 * (buf[index + offset3] + tmp2) + W2 * (buf[index + 2 * offset3] + tmp1);
            index += offset3;
            tmp1 = tmp2;
            tmp2 = tmp3;
        }
        let tmp3 = buf[index];
        buf[index] = buf[index] * W0 + W1 * (buf[index + offset3] + tmp2) + W2 * tmp1;
        index += offset3;
        buf[index] = buf[index] * W0 + W1 * tmp3 + W2 * tmp2;
    }
}

/// The z-axis pass approximates `-2 * d/dz` of a Gaussian (a detail /
/// edge-response kernel rather than a low-pass), so unlike the x/y passes it
/// has no `W0` (center) term.
fn blur_z_1d(buf: &mut [f32]) {
    const W1: f32 = 4.0 / 16.0;
    const W2: f32 = 2.0 / 16.0;
    let n = buf.len();

    let mut tmp1 = buf[0];
    buf[0] = W1 * buf[1] + W2 * buf[2];
    let mut tmp2 = buf[1];
    buf[1] = W1 * (buf[2] - tmp1) + W2 * buf[3];
    for i in 2..n - 2 {
        let tmp3 = buf[i];
        buf[i] = W1 * (buf[i + 1] - tmp2) + W2 * (buf[i + 2] - tmp1);
        tmp1 = tmp2;
        tmp2 = tmp3;
    }
    let tmp3 = buf[n - 2];
    buf[n - 2] = W1 * (buf[n - 1] - tmp2) - W2 * tmp1;
    buf[n - 1] = -W1 * tmp3 - W2 * tmp2;
}

/// Blurs along the z axis by gathering each `(x, y)` column into a
/// contiguous scratch buffer, blurring it, and scattering it back — the
/// z axis has the largest stride (`size_x * size_y`) of the three, so unlike
/// the x/y passes a column isn't already contiguous and can't be chunked
/// in place.
fn blur_z_axis(buf: &mut [f32], size_x: usize, size_y: usize, size_z: usize) {
    let plane = size_x * size_y;

    let mut columns = vec![0.0f32; plane * size_z];
    columns
        .par_chunks_mut(size_z)
        .enumerate()
        .for_each(|(line, col)| {
            for z in 0..size_z {
                col[z] = buf[z * plane + line];
            }
        });

    columns.par_chunks_mut(size_z).for_each(|col| blur_z_1d(col));

    buf.par_chunks_mut(plane)
        .enumerate()
        .for_each(|(z, out_plane)| {
            for (line, slot) in out_plane.iter_mut().enumerate() {
                *slot = columns[line * size_z + z];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_image(width: usize, height: usize, luma: f32) -> Vec<f32> {
        let mut v = vec![0.0f32; width * height * 4];
        for px in v.chunks_exact_mut(4) {
            px[0] = luma;
            px[1] = 0.1;
            px[2] = 0.2;
            px[3] = 1.0;
        }
        v
    }

    #[test]
    fn init_clamps_grid_resolution() {
        let grid = BilateralGrid::init(2000, 2000, 0.01, 0.01).unwrap();
        // sigma_s, sigma_r this small would ask for a grid far beyond the
        // resolution clamp; the clamped size stays bounded.
        assert!(grid.size_x() <= 6001);
        assert!(grid.size_y() <= 6001);
        assert!(grid.size_z() <= 51);
    }

    #[test]
    fn splat_then_slice_is_identity_at_zero_detail() {
        let width = 16;
        let height = 16;
        let image = flat_image(width, height, 50.0);

        let mut grid = BilateralGrid::init(width, height, 8.0, 8.0).unwrap();
        grid.splat(&image).unwrap();
        grid.blur();

        let mut out = vec![0.0f32; image.len()];
        grid.slice(&image, &mut out, 0.0).unwrap();

        for (a, b) in image.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-4, "{} vs {}", a, b);
        }
    }

    #[test]
    fn splat_mass_is_conserved() {
        let width = 8;
        let height = 8;
        let image = flat_image(width, height, 50.0);

        let mut grid = BilateralGrid::init(width, height, 4.0, 4.0).unwrap();
        grid.splat(&image).unwrap();

        let total: f32 = grid.buf.as_slice().iter().sum();
        let sigma_s = grid.sigma_s();
        let expected = width as f32 * height as f32 * 100.0 / (sigma_s * sigma_s);
        assert!((total - expected).abs() < expected * 0.05, "{} vs {}", total, expected);
    }

    #[test]
    fn size_mismatch_is_reported() {
        let mut grid = BilateralGrid::init(4, 4, 2.0, 2.0).unwrap();
        let bad = vec![0.0f32; 10];
        assert!(grid.splat(&bad).is_err());
    }

    #[test]
    fn invalid_sigma_is_rejected() {
        assert!(BilateralGrid::init(4, 4, 0.0, 1.0).is_err());
        assert!(BilateralGrid::init(4, 4, 1.0, -1.0).is_err());
    }
}
