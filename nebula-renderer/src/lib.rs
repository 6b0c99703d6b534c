//! # Nebula Renderer
//!
//! Immediate-mode renderer and frame loop for the Nebula canvas.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Text overlay (host UI, not drawn here)     │
//! ├─────────────────────────────────────────────┤
//! │  Shapes: circle / triangle / square         │
//! ├─────────────────────────────────────────────┤
//! │  Trails: polyline at 30% opacity            │
//! ├─────────────────────────────────────────────┤
//! │  Afterglow: 5% black over previous frame    │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod frame_loop;
pub mod overlay;
#[cfg(feature = "raster")]
pub mod raster;
pub mod recording;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::FrameExporter;
#[cfg(feature = "raster")]
pub use export::PngExporter;
pub use frame_loop::FrameLoop;
pub use overlay::{text_nodes, TextNode};
#[cfg(feature = "raster")]
pub use raster::RasterSurface;
pub use recording::{DrawCommand, RecordingSurface};
pub use surface::DrawSurface;

use nebula_core::{Bounds, Color, Particle, Point, Shape, Simulation};

/// Half-width of the equilateral triangle relative to its apex distance.
const TRIANGLE_HALF_WIDTH: f32 = 0.866;

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Opacity of the background wash drawn each frame.
    pub fade_alpha: f32,
    /// Trail opacity relative to the particle's own.
    pub trail_opacity: f32,
    /// Trail line width relative to particle size.
    pub trail_width: f32,
    /// Background color.
    pub background: Color,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            fade_alpha: 0.05,
            trail_opacity: 0.3,
            trail_width: 0.3,
            background: Color::black(),
        }
    }
}

/// Draws the simulation onto a [`DrawSurface`].
///
/// Holds no simulation state beyond a frame counter and a scratch buffer.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RendererConfig,
    frame_count: u64,
    trail_buffer: Vec<Point>,
}

impl Renderer {
    /// Create a renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            frame_count: 0,
            trail_buffer: Vec::new(),
        }
    }

    /// Render one frame. Returns `false` when skipped because the
    /// simulation has no surface bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects a transform or path.
    pub fn render(
        &mut self,
        simulation: &Simulation,
        surface: &mut dyn DrawSurface,
    ) -> RenderResult<bool> {
        let Some(size) = simulation.surface() else {
            tracing::trace!("Render skipped, no surface bound");
            return Ok(false);
        };
        let bounds = size.bounds();

        self.draw_backdrop(surface, bounds, self.config.fade_alpha);

        for particle in simulation.particles() {
            self.draw_particle(surface, particle)?;
        }

        self.frame_count += 1;
        tracing::trace!(
            "Frame {} rendered: {} particles",
            self.frame_count,
            simulation.particles().len()
        );
        Ok(true)
    }

    /// Paint the background fully opaque, wiping all afterglow.
    pub fn clear(&self, surface: &mut dyn DrawSurface, bounds: Bounds) {
        self.draw_backdrop(surface, bounds, 1.0);
    }

    fn draw_backdrop(&self, surface: &mut dyn DrawSurface, bounds: Bounds, alpha: f32) {
        surface.save();
        surface.set_global_alpha(alpha);
        surface.set_fill_color(&self.config.background);
        surface.fill_rect(0.0, 0.0, bounds.width, bounds.height);
        surface.restore();
    }

    fn draw_particle(
        &mut self,
        surface: &mut dyn DrawSurface,
        particle: &Particle,
    ) -> RenderResult<()> {
        let opacity = particle.opacity();

        surface.save();

        if particle.trail().len() >= 2 {
            self.trail_buffer.clear();
            self.trail_buffer.extend(particle.trail().iter().copied());
            surface.set_stroke_color(&particle.color);
            surface.set_line_width(particle.size * self.config.trail_width);
            surface.set_global_alpha(opacity * self.config.trail_opacity);
            surface.stroke_polyline(&self.trail_buffer);
        }

        let result = Self::draw_shape(surface, particle, opacity);
        surface.restore();
        result
    }

    fn draw_shape(
        surface: &mut dyn DrawSurface,
        particle: &Particle,
        opacity: f32,
    ) -> RenderResult<()> {
        surface.translate(particle.x, particle.y)?;
        surface.rotate(particle.rotation)?;
        surface.set_global_alpha(opacity);
        surface.set_fill_color(&particle.color);

        let s = particle.current_size;
        match particle.shape {
            Shape::Circle => surface.fill_circle(0.0, 0.0, s)?,
            Shape::Triangle => surface.fill_polygon(&triangle(s)),
            Shape::Square => surface.fill_rect(-s / 2.0, -s / 2.0, s, s),
        }
        Ok(())
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}

/// Point-up equilateral triangle around the origin.
#[must_use]
pub fn triangle(size: f32) -> [Point; 3] {
    [
        Point::new(0.0, -size),
        Point::new(size * TRIANGLE_HALF_WIDTH, size * 0.5),
        Point::new(-size * TRIANGLE_HALF_WIDTH, size * 0.5),
    ]
}

#[cfg(test)]
mod tests {
    use nebula_core::{SimulationConfig, SurfaceSize};

    use super::*;

    fn lone(shape: Shape, trail_steps: usize) -> Simulation {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 21);
        sim.start(SurfaceSize::new(200.0, 100.0));
        let pool = sim.pool_mut();
        pool.clear();
        let mut p = Particle::new(Point::new(50.0, 50.0), shape, 10.0, Color::new("#4ECDC4"));
        p.current_size = 10.0;
        p.alpha = 0.5;
        p.vx = 1.0;
        let config = SimulationConfig::default();
        for _ in 0..trail_steps {
            p.update(Bounds::new(200.0, 100.0), &config);
        }
        p.life = 1.0;
        pool.insert(p);
        sim
    }

    #[test]
    fn idle_simulation_is_skipped() {
        let sim = Simulation::with_seed(SimulationConfig::default(), 1);
        let mut surface = RecordingSurface::new(10.0, 10.0);
        let mut renderer = Renderer::default();
        assert!(!renderer.render(&sim, &mut surface).expect("render"));
        assert!(surface.commands().is_empty());
        assert_eq!(renderer.frame_count(), 0);
    }

    #[test]
    fn frame_starts_with_faint_backdrop() {
        let sim = lone(Shape::Circle, 0);
        let mut surface = RecordingSurface::new(200.0, 100.0);
        let mut renderer = Renderer::new(RendererConfig::default());
        assert!(renderer.render(&sim, &mut surface).expect("render"));
        let cmds = surface.commands();
        assert_eq!(cmds[0], DrawCommand::Save);
        assert_eq!(cmds[1], DrawCommand::GlobalAlpha(0.05));
        assert_eq!(cmds[2], DrawCommand::FillColor(Color::black()));
        assert_eq!(
            cmds[3],
            DrawCommand::FillRect {
                x: 0.0,
                y: 0.0,
                width: 200.0,
                height: 100.0
            }
        );
        assert_eq!(cmds[4], DrawCommand::Restore);
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn single_point_trail_is_not_stroked() {
        let sim = lone(Shape::Circle, 1);
        let mut surface = RecordingSurface::new(200.0, 100.0);
        Renderer::default().render(&sim, &mut surface).expect("render");
        assert!(!surface
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::StrokePolyline(_))));
    }

    #[test]
    fn trail_is_stroked_at_reduced_opacity() {
        let sim = lone(Shape::Square, 3);
        let mut surface = RecordingSurface::new(200.0, 100.0);
        Renderer::new(RendererConfig::default())
            .render(&sim, &mut surface)
            .expect("render");
        let cmds = surface.commands();
        let stroke_at = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::StrokePolyline(_)))
            .expect("trail stroked");
        let DrawCommand::StrokePolyline(points) = &cmds[stroke_at] else {
            unreachable!()
        };
        assert_eq!(points.len(), 3);
        assert_eq!(cmds[stroke_at - 1], DrawCommand::GlobalAlpha(0.5 * 0.3));
        assert_eq!(cmds[stroke_at - 2], DrawCommand::LineWidth(10.0 * 0.3));
    }

    #[test]
    fn shapes_are_drawn_rotated_at_their_position() {
        let sim = lone(Shape::Square, 0);
        let mut surface = RecordingSurface::new(200.0, 100.0);
        Renderer::default().render(&sim, &mut surface).expect("render");
        let cmds = surface.commands();
        assert!(cmds.contains(&DrawCommand::Translate { x: 50.0, y: 50.0 }));
        assert!(cmds.contains(&DrawCommand::FillRect {
            x: -5.0,
            y: -5.0,
            width: 10.0,
            height: 10.0
        }));
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn circle_and_triangle_use_their_primitives() {
        let mut surface = RecordingSurface::new(200.0, 100.0);
        Renderer::default()
            .render(&lone(Shape::Circle, 0), &mut surface)
            .expect("render");
        assert!(surface.commands().contains(&DrawCommand::FillCircle {
            cx: 0.0,
            cy: 0.0,
            radius: 10.0
        }));

        let mut surface = RecordingSurface::new(200.0, 100.0);
        Renderer::default()
            .render(&lone(Shape::Triangle, 0), &mut surface)
            .expect("render");
        assert!(surface
            .commands()
            .contains(&DrawCommand::FillPolygon(triangle(10.0).to_vec())));
    }

    #[test]
    fn triangle_is_point_up() {
        let [apex, right, left] = triangle(10.0);
        assert_eq!(apex, Point::new(0.0, -10.0));
        assert!((right.x - 8.66).abs() < 1e-4);
        assert!((left.x + 8.66).abs() < 1e-4);
        assert!((right.y - 5.0).abs() < 1e-6);
    }

    #[test]
    fn clear_paints_opaque_background() {
        let renderer = Renderer::default();
        let mut surface = RecordingSurface::new(30.0, 40.0);
        renderer.clear(&mut surface, Bounds::new(30.0, 40.0));
        assert!(surface.commands().contains(&DrawCommand::GlobalAlpha(1.0)));
    }
}
