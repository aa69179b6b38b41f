//! Shape records: what a mask covers, which scale it lives on, and which
//! of the four operators to run over it.
//!
//! Shape geometry itself is a closed tagged variant rather than a
//! vtable-over-void-pointer: the driver never needs to know a shape's
//! concrete kind, only that it can be rasterized into a mask, a source
//! area, and a source-to-destination delta (see [`crate::rasterizer`]).

/// The four per-scale editing operators a shape can apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    /// Blends pixels read from a source offset into the destination.
    Clone,
    /// Like clone, but runs the source/destination difference through the
    /// healing solver before blending.
    Heal,
    /// Blurs the masked region in place.
    Blur {
        /// Which blur implementation to run.
        blur_type: BlurType,
        /// Spatial radius in authoring-resolution pixels.
        blur_radius: f32,
    },
    /// Blends a constant color (or erases to a constant luminance) into
    /// the masked region.
    Fill {
        /// Whether to paint a flat color or erase to a flat luminance.
        fill_mode: FillMode,
        /// Base color, `(L, a, b)` or `(Y, U, V)` depending on the tile's
        /// channel convention.
        fill_color: [f32; 3],
        /// Added to the base color/luminance once per shape application.
        fill_brightness: f32,
    },
}

/// Which blur implementation [`Algorithm::Blur`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurType {
    /// Separable Gaussian with reflecting edges.
    Gaussian,
    /// The bilateral grid, run on an Lab-converted copy of the region.
    Bilateral,
}

/// Whether [`Algorithm::Fill`] paints a color or erases to flat luminance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    /// Ignore `fill_color`; write a constant luminance everywhere in the
    /// mask, leaving chroma at zero.
    Erase,
    /// Write the full `fill_color` triple.
    Color,
}

/// Closed-variant shape geometry, authored at a reference resolution
/// independent of any particular tile's scale.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeGeometry {
    /// A disc of the given radius.
    Circle {
        /// Center X, authoring resolution.
        cx: f32,
        /// Center Y, authoring resolution.
        cy: f32,
        /// Radius, authoring resolution.
        radius: f32,
    },
    /// An axis-aligned or rotated ellipse.
    Ellipse {
        /// Center X, authoring resolution.
        cx: f32,
        /// Center Y, authoring resolution.
        cy: f32,
        /// Semi-axis along the unrotated X direction.
        rx: f32,
        /// Semi-axis along the unrotated Y direction.
        ry: f32,
        /// Rotation in radians.
        rotation: f32,
    },
    /// A closed polygon with a feathered border.
    Path {
        /// Vertices in order, authoring resolution.
        points: Vec<(f32, f32)>,
        /// Feather width in pixels.
        border: f32,
    },
    /// A variable-radius stroke: a union of discs along a polyline.
    Brush {
        /// `(x, y, radius)` samples along the stroke.
        points: Vec<(f32, f32, f32)>,
    },
}

/// A shape as the driver sees it: geometry, which scale it's live on, and
/// which operator to run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeRecord {
    /// Caller-assigned identity, opaque to the driver.
    pub form_id: u64,
    /// Geometry used by the default rasterizer; external rasterizers may
    /// ignore this and key off `form_id` instead.
    pub geometry: ShapeGeometry,
    /// Scale this shape is evaluated on, `1..=num_scales + 1`.
    pub scale_index: u32,
    /// Which operator to run.
    pub algorithm: Algorithm,
    /// Blend strength, `[0, 1]`.
    pub opacity: f32,
    /// Authoring-resolution anchor point, used with `source_anchor` to
    /// derive clone/heal's source-to-destination pixel delta.
    pub anchor: (f32, f32),
    /// Authoring-resolution anchor of the source patch, for clone/heal.
    /// Ignored by blur/fill.
    pub source_anchor: (f32, f32),
    /// When set, the shape's mask (times opacity) is OR'd into the working
    /// buffer's alpha channel so the caller can overlay effective coverage.
    pub mask_display: bool,
}

impl ShapeRecord {
    /// `true` if this shape is live on the given logical scale index.
    pub fn is_live_on(&self, scale_index: u32) -> bool {
        self.scale_index == scale_index
    }
}
