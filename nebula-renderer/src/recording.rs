//! A surface that records draw calls instead of rasterizing them.
//!
//! Used for headless inspection and tests: every call is logged at trace
//! level and kept as a [`DrawCommand`].

use nebula_core::{Color, Point, SurfaceSize};

use crate::{DrawSurface, RenderResult};

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)] // Variants mirror the DrawSurface methods
pub enum DrawCommand {
    Resize(SurfaceSize),
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate(f32),
    GlobalAlpha(f32),
    FillColor(Color),
    StrokeColor(Color),
    LineWidth(f32),
    FillRect { x: f32, y: f32, width: f32, height: f32 },
    FillCircle { cx: f32, cy: f32, radius: f32 },
    FillPolygon(Vec<Point>),
    StrokePolyline(Vec<Point>),
}

/// Recording surface.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl RecordingSurface {
    /// Create a recording surface of the given logical size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
            depth: 0,
        }
    }

    /// Commands recorded so far.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take and clear the recorded commands.
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current save/restore nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn record(&mut self, command: DrawCommand) {
        tracing::trace!("Draw {command:?}");
        self.commands.push(command);
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn resize(&mut self, size: SurfaceSize) -> RenderResult<()> {
        self.width = size.width;
        self.height = size.height;
        self.record(DrawCommand::Resize(size));
        Ok(())
    }

    fn save(&mut self) {
        self.depth += 1;
        self.record(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.record(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) -> RenderResult<()> {
        self.record(DrawCommand::Translate { x, y });
        Ok(())
    }

    fn rotate(&mut self, radians: f32) -> RenderResult<()> {
        self.record(DrawCommand::Rotate(radians));
        Ok(())
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.record(DrawCommand::GlobalAlpha(alpha));
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.record(DrawCommand::FillColor(color.clone()));
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.record(DrawCommand::StrokeColor(color.clone()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.record(DrawCommand::LineWidth(width));
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.record(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
        });
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32) -> RenderResult<()> {
        self.record(DrawCommand::FillCircle { cx, cy, radius });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        self.record(DrawCommand::FillPolygon(points.to_vec()));
    }

    fn stroke_polyline(&mut self, points: &[Point]) {
        self.record(DrawCommand::StrokePolyline(points.to_vec()));
    }
}
