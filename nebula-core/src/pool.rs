//! The live collection of shape particles.

use std::f32::consts::TAU;

use rand::rngs::StdRng;

use crate::particle::uniform;
use crate::platform::{pulse, HapticIntensity, Haptics};
use crate::{Bounds, Palette, Particle, ParticleOverrides, Point, SimulationConfig};

/// Speed range of burst particles.
pub const BURST_SPEED_RANGE: (f32, f32) = (2.0, 6.0);
/// Size range of burst particles.
pub const BURST_SIZE_RANGE: (f32, f32) = (5.0, 20.0);
/// Decay of burst particles; they fade in about a hundred ticks.
pub const BURST_DECAY: f32 = 0.01;

/// Owns the shape particles and keeps the population above its floor.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    bounds: Bounds,
    palette: Palette,
    config: SimulationConfig,
    rng: StdRng,
}

impl ParticlePool {
    /// Create an empty pool.
    #[must_use]
    pub fn new(config: SimulationConfig, bounds: Bounds, palette: Palette, rng: StdRng) -> Self {
        Self {
            particles: Vec::with_capacity(config.initial_particles),
            bounds,
            palette,
            config,
            rng,
        }
    }

    /// Create one particle and add it to the pool.
    pub fn spawn(&mut self, position: Option<Point>, overrides: &ParticleOverrides) -> &Particle {
        let particle = Particle::random(
            &mut self.rng,
            self.bounds,
            &self.palette,
            position,
            overrides,
        );
        self.particles.push(particle);
        &self.particles[self.particles.len() - 1]
    }

    /// Add an already-built particle.
    pub fn insert(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advance every particle, drop the dead ones, then refill to the floor.
    pub fn tick(&mut self) {
        let bounds = self.bounds;
        let config = self.config;
        for particle in &mut self.particles {
            particle.update(bounds, &config);
        }

        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        let retired = before - self.particles.len();

        let replenished = self.fill_to(self.config.min_particles);
        if retired > 0 || replenished > 0 {
            tracing::trace!(
                "Pool tick: retired {retired}, replenished {replenished}, live {}",
                self.particles.len()
            );
        }
    }

    /// Spawn `count` fast, short-lived particles radiating from `(x, y)`.
    ///
    /// Directions are spaced evenly around the circle. Fires a light haptic.
    pub fn burst(&mut self, x: f32, y: f32, count: usize, haptics: &mut dyn Haptics) -> usize {
        let origin = Point::new(x, y);
        for i in 0..count {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * i as f32 / count as f32;
            let speed = uniform(&mut self.rng, BURST_SPEED_RANGE.0, BURST_SPEED_RANGE.1);
            let size = uniform(&mut self.rng, BURST_SIZE_RANGE.0, BURST_SIZE_RANGE.1);
            let overrides = ParticleOverrides {
                size: Some(size),
                velocity: Some((angle.cos() * speed, angle.sin() * speed)),
                decay: Some(BURST_DECAY),
                ..ParticleOverrides::default()
            };
            self.spawn(Some(origin), &overrides);
        }

        tracing::debug!("Burst of {count} at ({x:.1}, {y:.1})");
        pulse(haptics, HapticIntensity::Light);
        count
    }

    /// Nudge particles within `radius` of `(x, y)` along the pointer motion.
    ///
    /// Returns how many particles were affected.
    pub fn perturb(&mut self, x: f32, y: f32, dx: f32, dy: f32, radius: f32) -> usize {
        let origin = Point::new(x, y);
        let gain = self.config.perturb_gain;
        let mut affected = 0;
        for particle in &mut self.particles {
            if particle.position().distance_to(origin) < radius {
                particle.vx += dx * gain;
                particle.vy += dy * gain;
                affected += 1;
            }
        }
        affected
    }

    /// Clear the pool and repopulate to the initial count.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.fill_to(self.config.initial_particles);
        tracing::debug!("Pool reset to {} particles", self.particles.len());
    }

    /// Remove every particle.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    fn fill_to(&mut self, target: usize) -> usize {
        let missing = target.saturating_sub(self.particles.len());
        for _ in 0..missing {
            self.spawn(None, &ParticleOverrides::default());
        }
        missing
    }

    /// Update the logical bounds after a resize.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Replace the palette used for new particles.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Current logical bounds.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Palette used for new particles.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
