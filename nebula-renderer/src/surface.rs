//! The drawing-surface boundary.
//!
//! Everything the renderer needs from a 2D immediate-mode context. All
//! coordinates are logical; size and device pixel ratio are applied through
//! [`DrawSurface::resize`] when the surface is bound and whenever it changes.

use nebula_core::{Color, Point, SurfaceSize};

use crate::RenderResult;

/// A 2D immediate-mode drawing surface.
pub trait DrawSurface {
    /// Logical size of the surface.
    fn size(&self) -> (f32, f32);

    /// Adopt a new logical size and device pixel ratio.
    ///
    /// The backing store is reallocated at device resolution and cleared to
    /// black; any previous contents are lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be resized or the
    /// context rejects the transform.
    fn resize(&mut self, size: SurfaceSize) -> RenderResult<()>;

    /// Push the current transform, alpha and style.
    fn save(&mut self);

    /// Pop the state pushed by the matching [`DrawSurface::save`].
    fn restore(&mut self);

    /// Translate subsequent drawing.
    ///
    /// # Errors
    ///
    /// Returns an error if the context rejects the transform.
    fn translate(&mut self, x: f32, y: f32) -> RenderResult<()>;

    /// Rotate subsequent drawing by `radians`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context rejects the transform.
    fn rotate(&mut self, radians: f32) -> RenderResult<()>;

    /// Set the opacity multiplier for subsequent drawing.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Set the fill color.
    fn set_fill_color(&mut self, color: &Color);

    /// Set the stroke color.
    fn set_stroke_color(&mut self, color: &Color);

    /// Set the stroke width.
    fn set_line_width(&mut self, width: f32);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Fill a full circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the arc cannot be built.
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) -> RenderResult<()>;

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point]);

    /// Stroke an open polyline.
    fn stroke_polyline(&mut self, points: &[Point]);
}
