//! `<canvas>` 2D context as a [`DrawSurface`].

use std::f64::consts::TAU;

use nebula_core::{Color, Point, SurfaceSize};
use nebula_renderer::{DrawSurface, RenderError, RenderResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

fn surface_error(context: &str, err: &JsValue) -> RenderError {
    RenderError::Surface(format!("{context}: {err:?}"))
}

/// A browser canvas element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: f32,
    height: f32,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context is unavailable.
    pub fn new(canvas: HtmlCanvasElement) -> RenderResult<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| surface_error("Failed to get 2D context", &e))?
            .ok_or_else(|| RenderError::Surface("2D context not available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::Surface("Failed to cast to 2D context".into()))?;

        let (width, height) = css_size(&canvas);
        Ok(Self {
            canvas,
            ctx,
            width,
            height,
        })
    }

    /// Current CSS size of the element combined with `device_pixel_ratio`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn measure(canvas: &HtmlCanvasElement, device_pixel_ratio: f64) -> SurfaceSize {
        let (width, height) = css_size(canvas);
        SurfaceSize::new(width, height).with_device_pixel_ratio(device_pixel_ratio as f32)
    }

    /// The canvas element.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn trace_path(&self, points: &[Point]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        self.ctx.begin_path();
        self.ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            self.ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        true
    }
}

#[allow(clippy::cast_precision_loss)]
fn css_size(canvas: &HtmlCanvasElement) -> (f32, f32) {
    (
        canvas.client_width().max(0) as f32,
        canvas.client_height().max(0) as f32,
    )
}

impl DrawSurface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, size: SurfaceSize) -> RenderResult<()> {
        let bounds = size.bounds();
        let (width, height) = (bounds.width, bounds.height);
        self.width = width;
        self.height = height;

        // Resizing the backing store resets the context state.
        let (px_w, px_h) = size.device_pixels();
        self.canvas.set_width(px_w);
        self.canvas.set_height(px_h);
        let s = f64::from(size.device_pixel_ratio);
        self.ctx
            .set_transform(s, 0.0, 0.0, s, 0.0, 0.0)
            .map_err(|e| surface_error("Failed to scale context", &e))?;

        self.ctx.set_fill_style_str("#000000");
        self.ctx
            .fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
        Ok(())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) -> RenderResult<()> {
        self.ctx
            .translate(f64::from(x), f64::from(y))
            .map_err(|e| surface_error("translate", &e))
    }

    fn rotate(&mut self, radians: f32) -> RenderResult<()> {
        self.ctx
            .rotate(f64::from(radians))
            .map_err(|e| surface_error("rotate", &e))
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(f64::from(alpha));
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ctx.set_fill_style_str(color.as_str());
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ctx.set_stroke_style_str(color.as_str());
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(f64::from(width));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.fill_rect(
            f64::from(x),
            f64::from(y),
            f64::from(width),
            f64::from(height),
        );
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) -> RenderResult<()> {
        self.ctx.begin_path();
        self.ctx
            .arc(f64::from(cx), f64::from(cy), f64::from(radius.max(0.0)), 0.0, TAU)
            .map_err(|e| surface_error("arc", &e))?;
        self.ctx.fill();
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        if self.trace_path(points) {
            self.ctx.close_path();
            self.ctx.fill();
        }
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        if self.trace_path(points) {
            self.ctx.stroke();
        }
    }
}
