//! Tunable simulation parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{NebulaError, NebulaResult};

/// Parameters for the particle pool, text scheduler and touch handling.
///
/// Every field has a default, so a partial JSON document only needs to
/// name the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Particles created on start and on reset.
    pub initial_particles: usize,
    /// Population floor maintained after every tick.
    pub min_particles: usize,
    /// Maximum number of trail points kept per particle.
    pub trail_length: usize,
    /// Particles spawned by one touch burst.
    pub burst_count: usize,
    /// Radius around the pointer affected by a drag.
    pub perturb_radius: f32,
    /// Velocity gain applied per pixel of pointer displacement.
    pub perturb_gain: f32,
    /// Growth of `current_size` per tick.
    pub grow_step: f32,
    /// Velocity multiplier magnitude applied on a wall bounce.
    pub boundary_damping: f32,
    /// Cap on live text particles.
    pub max_text_particles: usize,
    /// Interval between text spawn attempts, in milliseconds.
    pub text_spawn_interval_ms: u64,
    /// Inset from each canvas edge for text spawn positions.
    pub text_margin: f32,
    /// Opacity gained by a text particle per frame.
    pub opacity_step: f32,
    /// Hold time before a touch counts as a long press, in milliseconds.
    pub long_press_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_particles: 50,
            min_particles: 30,
            trail_length: 20,
            burst_count: 8,
            perturb_radius: 150.0,
            perturb_gain: 0.02,
            grow_step: 0.5,
            boundary_damping: 0.8,
            max_text_particles: 8,
            text_spawn_interval_ms: 3000,
            text_margin: 50.0,
            opacity_step: 0.02,
            long_press_ms: 800,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are inconsistent.
    pub fn from_json(json: &str) -> NebulaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the parameters describe a usable simulation.
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError::Config`] naming the first offending field.
    pub fn validate(&self) -> NebulaResult<()> {
        if self.initial_particles == 0 {
            return Err(NebulaError::Config(
                "initial_particles must be at least 1".to_string(),
            ));
        }
        if self.min_particles > self.initial_particles {
            return Err(NebulaError::Config(format!(
                "min_particles ({}) exceeds initial_particles ({})",
                self.min_particles, self.initial_particles
            )));
        }
        if self.trail_length == 0 {
            return Err(NebulaError::Config(
                "trail_length must be at least 1".to_string(),
            ));
        }
        if !is_positive(self.perturb_radius) {
            return Err(NebulaError::Config(
                "perturb_radius must be positive".to_string(),
            ));
        }
        if !is_positive(self.grow_step) || !is_positive(self.opacity_step) {
            return Err(NebulaError::Config(
                "grow_step and opacity_step must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.boundary_damping) {
            return Err(NebulaError::Config(
                "boundary_damping must lie in [0, 1]".to_string(),
            ));
        }
        if self.text_spawn_interval_ms == 0 {
            return Err(NebulaError::Config(
                "text_spawn_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Text spawn interval as a [`Duration`].
    #[must_use]
    pub fn text_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.text_spawn_interval_ms)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
