//! The shape rasterizer boundary: the driver consumes masks, source areas,
//! and source/destination deltas but never owns the geometry that produces
//! them.
//!
//! [`GeometryRasterizer`] is the reference implementation built on
//! [`crate::shape::ShapeGeometry`], used by the test suite and any caller
//! that doesn't need a custom mask source (stroke smoothing, spline
//! evaluation, etc.) of their own.

use vfx_core::Rect;

use crate::shape::{ShapeGeometry, ShapeRecord};

/// A dense soft mask plus its authoring-resolution bounding box.
#[derive(Debug, Clone)]
pub struct RasterizedMask {
    /// Row-major coverage values in `[0, 1]`, `rect.width * rect.height` long.
    pub data: Vec<f32>,
    /// Bounding box in authoring (pre-scale) pixel coordinates.
    pub rect: Rect,
}

impl RasterizedMask {
    /// Coverage at authoring-resolution pixel `(x, y)`, or `0.0` outside
    /// `rect`.
    #[inline]
    pub fn sample(&self, x: i64, y: i64) -> f32 {
        let lx = x - self.rect.x as i64;
        let ly = y - self.rect.y as i64;
        if lx < 0 || ly < 0 || lx >= self.rect.width as i64 || ly >= self.rect.height as i64 {
            return 0.0;
        }
        self.data[ly as usize * self.rect.width as usize + lx as usize]
    }
}

/// Contract a shape source implements so the driver can evaluate shapes
/// without knowing their concrete geometry.
pub trait ShapeRasterizer {
    /// Returns the shape's mask at authoring resolution, or `None` if the
    /// shape currently rasterizes to nothing (degenerate geometry, a path
    /// with fewer than 3 points, etc). A `None` here is not an error: the
    /// driver skips the shape silently.
    fn get_mask(&self, shape: &ShapeRecord) -> Option<RasterizedMask>;

    /// The pre-scale bounding box of the shape's source patch, for
    /// clone/heal. `None` for algorithms that don't read from a source.
    fn get_source_area(&self, shape: &ShapeRecord) -> Option<Rect>;

    /// The integer `(dx, dy)` pixel offset such that
    /// `destination + (dx, dy) == source`, at the given tile scale.
    fn get_delta(&self, shape: &ShapeRecord, scale: f32) -> Option<(i32, i32)>;
}

/// Rasterizes [`ShapeGeometry`] directly: discs and ellipses get an
/// analytic soft edge, paths and brushes get a coarse point-sampled one.
#[derive(Debug, Clone, Copy)]
pub struct GeometryRasterizer {
    /// Width of the soft edge in authoring-resolution pixels. `0.0` gives
    /// a hard-edged (binary) mask.
    pub feather: f32,
}

impl Default for GeometryRasterizer {
    fn default() -> Self {
        Self { feather: 2.0 }
    }
}

impl GeometryRasterizer {
    /// Creates a rasterizer with a hard (non-feathered) edge.
    pub fn hard_edge() -> Self {
        Self { feather: 0.0 }
    }

    fn coverage_at_distance(&self, dist: f32, radius: f32) -> f32 {
        if self.feather <= 0.0 {
            return if dist < radius { 1.0 } else { 0.0 };
        }
        let inner = radius - self.feather;
        if dist <= inner {
            1.0
        } else if dist >= radius {
            0.0
        } else {
            1.0 - (dist - inner) / self.feather
        }
    }

    fn raster_circle(&self, cx: f32, cy: f32, radius: f32) -> RasterizedMask {
        let pad = self.feather.max(0.0).ceil() as i64 + 1;
        let x0 = (cx - radius).floor() as i64 - pad;
        let y0 = (cy - radius).floor() as i64 - pad;
        let x1 = (cx + radius).ceil() as i64 + pad;
        let y1 = (cy + radius).ceil() as i64 + pad;
        let rect = Rect::from_corners(x0.max(0) as u32, y0.max(0) as u32, x1.max(0) as u32, y1.max(0) as u32);

        let mut data = vec![0.0f32; rect.width as usize * rect.height as usize];
        for j in 0..rect.height {
            for i in 0..rect.width {
                let px = (rect.x + i) as f32 + 0.5;
                let py = (rect.y + j) as f32 + 0.5;
                let dist = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                data[j as usize * rect.width as usize + i as usize] =
                    self.coverage_at_distance(dist, radius);
            }
        }
        RasterizedMask { data, rect }
    }

    fn raster_ellipse(&self, cx: f32, cy: f32, rx: f32, ry: f32, rotation: f32) -> RasterizedMask {
        let r_max = rx.max(ry);
        let pad = self.feather.max(0.0).ceil() as i64 + 1;
        let x0 = (cx - r_max).floor() as i64 - pad;
        let y0 = (cy - r_max).floor() as i64 - pad;
        let x1 = (cx + r_max).ceil() as i64 + pad;
        let y1 = (cy + r_max).ceil() as i64 + pad;
        let rect = Rect::from_corners(x0.max(0) as u32, y0.max(0) as u32, x1.max(0) as u32, y1.max(0) as u32);

        let (sin_r, cos_r) = rotation.sin_cos();
        let mut data = vec![0.0f32; rect.width as usize * rect.height as usize];
        for j in 0..rect.height {
            for i in 0..rect.width {
                let px = (rect.x + i) as f32 + 0.5 - cx;
                let py = (rect.y + j) as f32 + 0.5 - cy;
                // Rotate into the ellipse's local frame.
                let lx = px * cos_r + py * sin_r;
                let ly = -px * sin_r + py * cos_r;
                let normalized = ((lx / rx).powi(2) + (ly / ry).powi(2)).sqrt();
                // Approximate a feather in normalized-radius units by a
                // local radius estimate along the ray through this point.
                let local_radius = if normalized > 1e-6 {
                    1.0 / normalized * (lx.powi(2) + ly.powi(2)).sqrt()
                } else {
                    rx.min(ry)
                };
                let dist = (lx.powi(2) + ly.powi(2)).sqrt();
                data[j as usize * rect.width as usize + i as usize] =
                    self.coverage_at_distance(dist, local_radius);
            }
        }
        RasterizedMask { data, rect }
    }

    fn raster_brush(&self, points: &[(f32, f32, f32)]) -> Option<RasterizedMask> {
        if points.is_empty() {
            return None;
        }
        let pad = self.feather.max(0.0).ceil() as i64 + 1;
        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y, r) in points {
            x0 = x0.min(x - r);
            y0 = y0.min(y - r);
            x1 = x1.max(x + r);
            y1 = y1.max(y + r);
        }
        let rect = Rect::from_corners(
            (x0.floor() as i64 - pad).max(0) as u32,
            (y0.floor() as i64 - pad).max(0) as u32,
            (x1.ceil() as i64 + pad).max(0) as u32,
            (y1.ceil() as i64 + pad).max(0) as u32,
        );

        let mut data = vec![0.0f32; rect.width as usize * rect.height as usize];
        for j in 0..rect.height {
            for i in 0..rect.width {
                let px = (rect.x + i) as f32 + 0.5;
                let py = (rect.y + j) as f32 + 0.5;
                let mut best = 0.0f32;
                for &(x, y, r) in points {
                    let dist = ((px - x).powi(2) + (py - y).powi(2)).sqrt();
                    best = best.max(self.coverage_at_distance(dist, r));
                }
                data[j as usize * rect.width as usize + i as usize] = best;
            }
        }
        Some(RasterizedMask { data, rect })
    }

    fn raster_path(&self, points: &[(f32, f32)], border: f32) -> Option<RasterizedMask> {
        if points.len() < 3 {
            return None;
        }
        let pad = (self.feather.max(0.0) + border.max(0.0)).ceil() as i64 + 1;
        let (mut x0, mut y0, mut x1, mut y1) = (f32::MAX, f32::MAX, f32::MIN, f32::MIN);
        for &(x, y) in points {
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x);
            y1 = y1.max(y);
        }
        let rect = Rect::from_corners(
            (x0.floor() as i64 - pad).max(0) as u32,
            (y0.floor() as i64 - pad).max(0) as u32,
            (x1.ceil() as i64 + pad).max(0) as u32,
            (y1.ceil() as i64 + pad).max(0) as u32,
        );

        let mut data = vec![0.0f32; rect.width as usize * rect.height as usize];
        for j in 0..rect.height {
            for i in 0..rect.width {
                let px = (rect.x + i) as f32 + 0.5;
                let py = (rect.y + j) as f32 + 0.5;
                let inside = point_in_polygon(px, py, points);
                let edge_dist = distance_to_polygon_edge(px, py, points);
                let coverage = if self.feather <= 0.0 && border <= 0.0 {
                    if inside { 1.0 } else { 0.0 }
                } else {
                    let soft = self.feather.max(border).max(1e-3);
                    let signed = if inside { edge_dist } else { -edge_dist };
                    ((signed + soft / 2.0) / soft).clamp(0.0, 1.0)
                };
                data[j as usize * rect.width as usize + i as usize] = coverage;
            }
        }
        Some(RasterizedMask { data, rect })
    }
}

fn point_in_polygon(px: f32, py: f32, points: &[(f32, f32)]) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) {
            let x_cross = xi + (py - yi) / (yj - yi) * (xj - xi);
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_polygon_edge(px: f32, py: f32, points: &[(f32, f32)]) -> f32 {
    let n = points.len();
    let mut best = f32::MAX;
    for i in 0..n {
        let (x1, y1) = points[i];
        let (x2, y2) = points[(i + 1) % n];
        let dx = x2 - x1;
        let dy = y2 - y1;
        let len2 = dx * dx + dy * dy;
        let t = if len2 > 1e-9 {
            (((px - x1) * dx + (py - y1) * dy) / len2).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let cx = x1 + t * dx;
        let cy = y1 + t * dy;
        let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
        best = best.min(d);
    }
    best
}

impl ShapeRasterizer for GeometryRasterizer {
    fn get_mask(&self, shape: &ShapeRecord) -> Option<RasterizedMask> {
        match &shape.geometry {
            ShapeGeometry::Circle { cx, cy, radius } => {
                if *radius <= 0.0 {
                    return None;
                }
                Some(self.raster_circle(*cx, *cy, *radius))
            }
            ShapeGeometry::Ellipse { cx, cy, rx, ry, rotation } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return None;
                }
                Some(self.raster_ellipse(*cx, *cy, *rx, *ry, *rotation))
            }
            ShapeGeometry::Path { points, border } => self.raster_path(points, *border),
            ShapeGeometry::Brush { points } => self.raster_brush(points),
        }
    }

    fn get_source_area(&self, shape: &ShapeRecord) -> Option<Rect> {
        match shape.algorithm {
            crate::shape::Algorithm::Clone | crate::shape::Algorithm::Heal => {
                let mask = self.get_mask(shape)?;
                let dx = (shape.source_anchor.0 - shape.anchor.0).round() as i32;
                let dy = (shape.source_anchor.1 - shape.anchor.1).round() as i32;
                Some(mask.rect.translate(dx, dy))
            }
            _ => None,
        }
    }

    fn get_delta(&self, shape: &ShapeRecord, scale: f32) -> Option<(i32, i32)> {
        match shape.algorithm {
            crate::shape::Algorithm::Clone | crate::shape::Algorithm::Heal => {
                let dx = (shape.source_anchor.0 - shape.anchor.0) * scale;
                let dy = (shape.source_anchor.1 - shape.anchor.1) * scale;
                Some((dx.round() as i32, dy.round() as i32))
            }
            _ => None,
        }
    }
}
