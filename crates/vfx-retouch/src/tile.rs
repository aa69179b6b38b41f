//! The unit of work the driver operates on: a pixel region plus the scale
//! factor relating its resolution to the authoring resolution of shape
//! parameters (brush radii, fill colors are scale-independent; positions
//! and radii measured in pixels are not).

use vfx_core::Rect;

/// A rectangular region of interest at a given render scale.
///
/// `scale` is the ratio of this tile's resolution to the resolution shape
/// geometry was authored at: a preview pipe running at half size reports
/// `scale = 0.5`, so a shape whose mask was rasterized at full size must be
/// resampled by the same factor before it lines up with this tile's pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Pixel bounds of this tile, in its own (scaled) coordinate system.
    pub rect: Rect,
    /// Ratio of this tile's resolution to authoring resolution, `(0, 1]`.
    pub scale: f32,
}

impl Tile {
    /// Creates a new tile.
    pub fn new(rect: Rect, scale: f32) -> Self {
        Self { rect, scale }
    }

    /// Width of the tile in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.rect.width as usize
    }

    /// Height of the tile in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.rect.height as usize
    }

    /// Number of floats in a 4-channel buffer sized for this tile.
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.width() * self.height() * 4
    }
}
