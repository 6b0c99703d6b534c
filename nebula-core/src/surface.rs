//! Canvas geometry in logical coordinates.

use serde::{Deserialize, Serialize};

/// A position in logical canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Logical extent of the canvas used by the simulation.
///
/// Dimensions are always finite and non-negative; anything else collapses
/// to zero so random generation never sees an inverted range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
}

impl Bounds {
    /// Create bounds, clamping degenerate dimensions to zero.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// Whether either axis has no extent.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `x` lies outside `[0, width]`.
    #[must_use]
    pub fn outside_x(&self, x: f32) -> bool {
        x < 0.0 || x > self.width
    }

    /// Whether `y` lies outside `[0, height]`.
    #[must_use]
    pub fn outside_y(&self, y: f32) -> bool {
        y < 0.0 || y > self.height
    }
}

/// A bound drawing surface: logical size plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Logical-to-device scale factor.
    pub device_pixel_ratio: f32,
}

impl SurfaceSize {
    /// A surface with a device pixel ratio of 1.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Set the device pixel ratio; non-positive ratios fall back to 1.
    #[must_use]
    pub fn with_device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        };
        self
    }

    /// Logical bounds for the simulation.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    /// Device pixel dimensions, at least 1x1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn device_pixels(&self) -> (u32, u32) {
        let bounds = self.bounds();
        let w = (bounds.width * self.device_pixel_ratio).round().max(1.0) as u32;
        let h = (bounds.height * self.device_pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_dimensions_clamp_to_zero() {
        let bounds = Bounds::new(-20.0, f32::NAN);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn outside_checks_are_exclusive_of_edges() {
        let bounds = Bounds::new(100.0, 50.0);
        assert!(!bounds.outside_x(0.0));
        assert!(!bounds.outside_x(100.0));
        assert!(bounds.outside_x(100.5));
        assert!(bounds.outside_y(-0.1));
    }

    #[test]
    fn device_pixels_apply_ratio() {
        let size = SurfaceSize::new(375.0, 667.0).with_device_pixel_ratio(2.0);
        assert_eq!(size.device_pixels(), (750, 1334));
    }

    #[test]
    fn invalid_ratio_falls_back_to_one() {
        let size = SurfaceSize::new(10.0, 10.0).with_device_pixel_ratio(0.0);
        assert!((size.device_pixel_ratio - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_surface_still_has_one_device_pixel() {
        let size = SurfaceSize::new(0.0, -5.0);
        assert_eq!(size.device_pixels(), (1, 1));
    }

    #[test]
    fn distance_is_euclidean() {
        let d = Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-6);
    }
}
