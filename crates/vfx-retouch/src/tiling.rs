//! Per-engine memory sizing so a host pipeline can decide whether an image
//! needs to be tiled before it fits a fixed processing budget.
//!
//! Each engine reports `(per_pixel_factor, single_buffer_size, halo_pixels)`
//! rather than deciding a tile size itself: the factor scales the bytes a
//! `width x height` tile needs beyond its own pixel data (scratch buffers,
//! the bilateral grid, one extra pyramid level), and the halo is how many
//! pixels of context each tile needs from its neighbors before its output
//! near the tile edge is trustworthy.

/// Bytes-per-pixel sizing for one of the three engines in this crate
/// family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMemory {
    /// Multiplier on `width * height * 4 * size_of::<f32>()` a tile needs
    /// beyond its own input/output buffers.
    pub per_pixel_factor: f32,
    /// Bytes a single `width x height` working buffer occupies.
    pub single_buffer_size: usize,
    /// Pixels of neighboring-tile context required on every edge so this
    /// tile's own output is correct near its boundary.
    pub halo_pixels: u32,
}

fn tile_bytes(width: usize, height: usize) -> usize {
    width * height * 4 * std::mem::size_of::<f32>()
}

/// Memory profile for the bilateral grid engine.
///
/// Factor is `2 + grid_bytes / tile_bytes`: one tile for input, one for
/// output, plus however many tile-equivalents the grid itself costs.
pub fn bilateral_tiling(width: usize, height: usize, sigma_s: f32) -> TileMemory {
    let tile_bytes = tile_bytes(width, height);
    let grid_bytes = vfx_bilateral::memory_use(width, height, sigma_s.max(1e-3), 100.0);
    let per_pixel_factor = 2.0 + grid_bytes as f32 / tile_bytes.max(1) as f32;
    TileMemory {
        per_pixel_factor,
        single_buffer_size: tile_bytes,
        halo_pixels: (4.0 * sigma_s).ceil() as u32,
    }
}

/// Memory profile for the reflect-boundary separable Gaussian engine.
///
/// Factor is `2 + 1`: input, output, and one extra tile-sized scratch
/// buffer for the horizontal pass's intermediate result.
pub fn gaussian_tiling(width: usize, height: usize, sigma_s: f32) -> TileMemory {
    let tile_bytes = tile_bytes(width, height);
    TileMemory {
        per_pixel_factor: 3.0,
        single_buffer_size: tile_bytes,
        halo_pixels: (4.0 * sigma_s).ceil() as u32,
    }
}

/// Memory profile for the à-trous wavelet engine.
///
/// Factor is `2 + one_pyramid_tile`: input, output, plus (approximately)
/// one tile-sized buffer per active pyramid level held in memory at once.
/// Halo is the dilated kernel's full support at `num_scales` levels.
pub fn wavelet_tiling(width: usize, height: usize, num_scales: usize) -> TileMemory {
    let tile_bytes = tile_bytes(width, height);
    TileMemory {
        per_pixel_factor: 3.0,
        single_buffer_size: tile_bytes,
        halo_pixels: (2 * ((1usize << num_scales) - 1)) as u32,
    }
}
