//! Shape particles and their per-tick update rule.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Bounds, Color, Palette, Point, SimulationConfig};

/// Default target size range.
pub const SIZE_RANGE: (f32, f32) = (5.0, 25.0);
/// Per-axis velocity range for ambient particles.
pub const VELOCITY_RANGE: (f32, f32) = (-1.5, 1.5);
/// Rotation speed range, radians per tick.
pub const ROTATION_SPEED_RANGE: (f32, f32) = (-0.05, 0.05);
/// Life lost per tick.
pub const DECAY_RANGE: (f32, f32) = (0.0005, 0.0025);
/// Base opacity range.
pub const ALPHA_RANGE: (f32, f32) = (0.3, 0.8);

/// Shape primitive drawn for a particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Filled circle of radius `current_size`.
    Circle,
    /// Point-up equilateral triangle.
    Triangle,
    /// Axis-aligned square of side `current_size`.
    Square,
}

impl Shape {
    /// Every shape, for uniform selection.
    pub const ALL: [Shape; 3] = [Self::Circle, Self::Triangle, Self::Square];
}

/// Attributes that replace the randomized defaults in [`Particle::random`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleOverrides {
    /// Fixed shape.
    pub shape: Option<Shape>,
    /// Fixed target size.
    pub size: Option<f32>,
    /// Fixed color.
    pub color: Option<Color>,
    /// Fixed initial velocity.
    pub velocity: Option<(f32, f32)>,
    /// Fixed decay per tick.
    pub decay: Option<f32>,
}

/// A shape particle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// X velocity, pixels per tick.
    pub vx: f32,
    /// Y velocity, pixels per tick.
    pub vy: f32,
    /// Target size the particle grows into.
    pub size: f32,
    /// Animated size, never above `size`.
    pub current_size: f32,
    /// Fill and trail color.
    pub color: Color,
    /// Shape primitive.
    pub shape: Shape,
    /// Rotation in radians.
    pub rotation: f32,
    /// Rotation added per tick.
    pub rotation_speed: f32,
    /// Remaining life, from 1 down to 0.
    pub life: f32,
    /// Life lost per tick.
    pub decay: f32,
    /// Base opacity.
    pub alpha: f32,
    trail: VecDeque<Point>,
}

impl Particle {
    /// Build a particle at `position` with default attributes.
    ///
    /// Size starts at zero and grows toward `size`.
    #[must_use]
    pub fn new(position: Point, shape: Shape, size: f32, color: Color) -> Self {
        Self {
            x: position.x,
            y: position.y,
            vx: 0.0,
            vy: 0.0,
            size: size.max(0.0),
            current_size: 0.0,
            color,
            shape,
            rotation: 0.0,
            rotation_speed: 0.0,
            life: 1.0,
            decay: DECAY_RANGE.0,
            alpha: 1.0,
            trail: VecDeque::new(),
        }
    }

    /// The particle factory: every randomized attribute in one place.
    ///
    /// A missing position is drawn uniformly within `bounds`.
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: Bounds,
        palette: &Palette,
        position: Option<Point>,
        overrides: &ParticleOverrides,
    ) -> Self {
        let position = position.unwrap_or_else(|| {
            Point::new(
                uniform(rng, 0.0, bounds.width),
                uniform(rng, 0.0, bounds.height),
            )
        });
        let shape = overrides
            .shape
            .or_else(|| Shape::ALL.choose(rng).copied())
            .unwrap_or(Shape::Circle);
        let size = overrides
            .size
            .unwrap_or_else(|| uniform(rng, SIZE_RANGE.0, SIZE_RANGE.1));
        let color = overrides
            .color
            .clone()
            .unwrap_or_else(|| palette.pick(rng));
        let (vx, vy) = overrides.velocity.unwrap_or_else(|| {
            (
                uniform(rng, VELOCITY_RANGE.0, VELOCITY_RANGE.1),
                uniform(rng, VELOCITY_RANGE.0, VELOCITY_RANGE.1),
            )
        });
        let decay = overrides
            .decay
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or_else(|| uniform(rng, DECAY_RANGE.0, DECAY_RANGE.1));

        Self {
            vx,
            vy,
            rotation: uniform(rng, 0.0, TAU),
            rotation_speed: uniform(rng, ROTATION_SPEED_RANGE.0, ROTATION_SPEED_RANGE.1),
            decay,
            alpha: uniform(rng, ALPHA_RANGE.0, ALPHA_RANGE.1),
            ..Self::new(position, shape, size, color)
        }
    }

    /// Advance one tick: move, bounce, rotate, grow, record trail, decay.
    pub fn update(&mut self, bounds: Bounds, config: &SimulationConfig) {
        self.x += self.vx;
        self.y += self.vy;

        if bounds.outside_x(self.x) {
            self.vx *= -config.boundary_damping;
        }
        if bounds.outside_y(self.y) {
            self.vy *= -config.boundary_damping;
        }

        self.rotation += self.rotation_speed;

        if self.current_size < self.size {
            self.current_size = (self.current_size + config.grow_step).min(self.size);
        }

        self.trail.push_back(Point::new(self.x, self.y));
        while self.trail.len() > config.trail_length {
            self.trail.pop_front();
        }

        self.life = (self.life - self.decay).max(0.0);
    }

    /// Whether the particle still has life left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Draw opacity: `alpha * life`.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        (self.alpha * self.life).clamp(0.0, 1.0)
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Recent positions, oldest first.
    #[must_use]
    pub fn trail(&self) -> &VecDeque<Point> {
        &self.trail
    }
}

/// Sample `[low, high)`, or `low` when the range is empty.
pub(crate) fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    if high > low {
        rng.gen_range(low..high)
    } else {
        low
    }
}
