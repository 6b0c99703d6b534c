//! CPU raster surface backed by a tiny-skia pixmap.

use std::path::Path as FsPath;

use nebula_core::{Color, Point, SurfaceSize};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::{DrawSurface, RenderError, RenderResult};

fn black_pixmap(size: SurfaceSize) -> RenderResult<Pixmap> {
    let (px_w, px_h) = size.device_pixels();
    let mut pixmap = Pixmap::new(px_w, px_h)
        .ok_or_else(|| RenderError::Surface(format!("cannot allocate {px_w}x{px_h} pixmap")))?;
    pixmap.fill(tiny_skia::Color::BLACK);
    Ok(pixmap)
}

#[derive(Debug, Clone, Copy)]
struct RasterState {
    transform: Transform,
    alpha: f32,
    fill: [u8; 3],
    stroke: [u8; 3],
    line_width: f32,
}

impl Default for RasterState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            alpha: 1.0,
            fill: [0, 0, 0],
            stroke: [0, 0, 0],
            line_width: 1.0,
        }
    }
}

/// Software surface for headless rendering and PNG export.
pub struct RasterSurface {
    pixmap: Pixmap,
    width: f32,
    height: f32,
    scale: f32,
    state: RasterState,
    stack: Vec<RasterState>,
}

impl RasterSurface {
    /// Allocate a surface at device resolution, cleared to opaque black.
    ///
    /// # Errors
    ///
    /// Returns an error if the pixmap cannot be allocated.
    pub fn new(size: SurfaceSize) -> RenderResult<Self> {
        let bounds = size.bounds();
        Ok(Self {
            pixmap: black_pixmap(size)?,
            width: bounds.width,
            height: bounds.height,
            scale: size.device_pixel_ratio,
            state: RasterState::default(),
            stack: Vec::new(),
        })
    }

    /// Fill the whole pixmap with an opaque color, ignoring transform and alpha.
    pub fn clear(&mut self, color: &Color) {
        let [r, g, b] = color.rgb().unwrap_or([0, 0, 0]);
        self.pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));
    }

    /// The backing pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode the current frame as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Encode the current frame and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save_png(&self, path: &FsPath) -> RenderResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale).pre_concat(self.state.transform)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn paint(&self, rgb: [u8; 3]) -> Paint<'static> {
        let mut paint = Paint::default();
        let alpha = (self.state.alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], alpha);
        paint.anti_alias = true;
        paint
    }

    fn polyline(points: &[Point], close: bool) -> Option<tiny_skia::Path> {
        let (first, rest) = points.split_first()?;
        let mut pb = PathBuilder::new();
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        if close {
            pb.close();
        }
        pb.finish()
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, size: SurfaceSize) -> RenderResult<()> {
        let scale = size.device_pixel_ratio;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RenderError::Surface(format!("invalid scale {scale}")));
        }
        self.pixmap = black_pixmap(size)?;
        let bounds = size.bounds();
        self.width = bounds.width;
        self.height = bounds.height;
        self.scale = scale;
        self.state = RasterState::default();
        self.stack.clear();
        tracing::debug!(
            "Raster surface resized to {}x{} @{}x",
            self.width,
            self.height,
            scale
        );
        Ok(())
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) -> RenderResult<()> {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_translate(x, y));
        Ok(())
    }

    fn rotate(&mut self, radians: f32) -> RenderResult<()> {
        self.state.transform = self
            .state
            .transform
            .pre_concat(Transform::from_rotate(radians.to_degrees()));
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha;
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.state.fill = color.rgb().unwrap_or([255, 255, 255]);
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.state.stroke = color.rgb().unwrap_or([255, 255, 255]);
    }

    fn set_line_width(&mut self, width: f32) {
        self.state.line_width = width;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        if let Some(rect) = Rect::from_xywh(x, y, width, height) {
            let paint = self.paint(self.state.fill);
            self.pixmap.fill_rect(rect, &paint, self.transform(), None);
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) -> RenderResult<()> {
        if radius <= 0.0 {
            return Ok(());
        }
        let path = PathBuilder::from_circle(cx, cy, radius)
            .ok_or_else(|| RenderError::Surface(format!("invalid circle radius {radius}")))?;
        let paint = self.paint(self.state.fill);
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, self.transform(), None);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        if let Some(path) = Self::polyline(points, true) {
            let paint = self.paint(self.state.fill);
            self.pixmap
                .fill_path(&path, &paint, FillRule::Winding, self.transform(), None);
        }
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        if let Some(path) = Self::polyline(points, false) {
            let paint = self.paint(self.state.stroke);
            let stroke = Stroke {
                width: self.state.line_width,
                ..Stroke::default()
            };
            self.pixmap
                .stroke_path(&path, &paint, &stroke, self.transform(), None);
        }
    }
}
