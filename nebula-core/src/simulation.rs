//! Simulation state: palette, particle pool, text particles and touch state
//! for one canvas session.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::interaction::{InteractionHandler, LongPress};
use crate::platform::Haptics;
use crate::{
    Bounds, Palette, Particle, ParticlePool, SimulationConfig, SurfaceSize, TextParticle,
    TextScheduler, TouchEvent,
};

/// Whether a drawing surface is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoopState {
    /// No surface; every tick is a no-op.
    Idle,
    /// Surface bound, frames are being produced.
    Running,
}

/// The complete state of one canvas session.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    state: LoopState,
    surface: Option<SurfaceSize>,
    palette: Palette,
    pool: ParticlePool,
    texts: TextScheduler,
    interaction: InteractionHandler,
    rng: StdRng,
    ticks: u64,
}

impl Simulation {
    /// Create an idle simulation seeded from system entropy.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an idle simulation with a fixed seed.
    #[must_use]
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, mut rng: StdRng) -> Self {
        let palette = Palette::random(&mut rng);
        let pool = ParticlePool::new(
            config,
            Bounds::default(),
            palette.clone(),
            StdRng::seed_from_u64(rng.next_u64()),
        );
        let texts = TextScheduler::new(config, StdRng::seed_from_u64(rng.next_u64()));
        Self {
            config,
            state: LoopState::Idle,
            surface: None,
            palette,
            pool,
            texts,
            interaction: InteractionHandler::new(config),
            rng,
            ticks: 0,
        }
    }

    /// Bind a surface: pick a palette and populate the pool.
    ///
    /// Returns `false` if the simulation was already running.
    pub fn start(&mut self, surface: SurfaceSize) -> bool {
        if self.state == LoopState::Running {
            tracing::debug!("Simulation already running, start ignored");
            return false;
        }

        self.surface = Some(surface);
        self.pool.set_bounds(surface.bounds());
        self.repopulate();
        self.state = LoopState::Running;

        tracing::info!(
            "Simulation started on {}x{} @{}x with {:?} palette",
            surface.width,
            surface.height,
            surface.device_pixel_ratio,
            self.palette.kind()
        );
        true
    }

    /// Unbind the surface. Returns `false` if already idle.
    pub fn stop(&mut self) -> bool {
        if self.state == LoopState::Idle {
            return false;
        }
        self.state = LoopState::Idle;
        self.surface = None;
        self.texts.clear();
        self.interaction.clear();
        tracing::info!("Simulation stopped after {} ticks", self.ticks);
        true
    }

    /// Advance particles and text particles by one frame.
    ///
    /// Returns `false` (and does nothing) while idle.
    pub fn step(&mut self) -> bool {
        let Some(bounds) = self.bounds() else {
            return false;
        };
        self.pool.tick();
        self.texts.update(bounds);
        self.ticks += 1;
        true
    }

    /// Interval callback: spawn a text particle if a surface is bound.
    pub fn spawn_text(&mut self) -> Option<u64> {
        let Some(bounds) = self.bounds() else {
            tracing::trace!("Text spawn skipped, no surface bound");
            return None;
        };
        self.texts.tick(bounds, &self.palette)
    }

    /// New palette, fresh population, no text particles.
    pub fn reset(&mut self) {
        self.repopulate();
        tracing::info!("Simulation reset with {:?} palette", self.palette.kind());
    }

    fn repopulate(&mut self) {
        self.palette = Palette::random(&mut self.rng);
        self.pool.set_palette(self.palette.clone());
        self.pool.reset();
        self.texts.clear();
        self.interaction.clear();
    }

    /// Adopt new surface dimensions without restarting.
    pub fn resize(&mut self, surface: SurfaceSize) {
        if self.state == LoopState::Idle {
            return;
        }
        self.surface = Some(surface);
        self.pool.set_bounds(surface.bounds());
        tracing::debug!("Simulation resized to {}x{}", surface.width, surface.height);
    }

    /// Route a touch event to the interaction handler. Ignored while idle.
    pub fn handle_touch(&mut self, event: &TouchEvent, haptics: &mut dyn Haptics) {
        if self.state == LoopState::Idle {
            tracing::trace!("Touch ignored, simulation idle");
            return;
        }
        self.interaction.handle(event, &mut self.pool, haptics);
    }

    /// Check whether a held touch has become a long press.
    pub fn poll_long_press(&mut self, now_ms: u64) -> Option<LongPress> {
        if self.state == LoopState::Idle {
            return None;
        }
        self.interaction.poll(now_ms)
    }

    fn bounds(&self) -> Option<Bounds> {
        match self.state {
            LoopState::Running => self.surface.map(|s| s.bounds()),
            LoopState::Idle => None,
        }
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Whether a surface is bound.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// The bound surface, if any.
    #[must_use]
    pub fn surface(&self) -> Option<SurfaceSize> {
        self.surface
    }

    /// Parameters in use.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Active palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The particle pool.
    #[must_use]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Mutable access to the particle pool.
    pub fn pool_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    /// Live shape particles, in draw order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        self.pool.particles()
    }

    /// Live text particles for the overlay layer.
    #[must_use]
    pub fn text_particles(&self) -> &[TextParticle] {
        self.texts.particles()
    }

    /// Frames simulated since creation.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NoHaptics, TouchPhase};

    fn running() -> Simulation {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 17);
        assert!(sim.start(SurfaceSize::new(375.0, 667.0)));
        sim
    }

    #[test]
    fn new_simulation_is_idle_and_empty() {
        let sim = Simulation::with_seed(SimulationConfig::default(), 1);
        assert_eq!(sim.state(), LoopState::Idle);
        assert!(sim.particles().is_empty());
        assert!(sim.text_particles().is_empty());
    }

    #[test]
    fn start_populates_to_initial_count() {
        let sim = running();
        assert!(sim.is_running());
        assert_eq!(sim.particles().len(), 50);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut sim = running();
        sim.step();
        assert!(!sim.start(SurfaceSize::new(10.0, 10.0)));
        assert_eq!(sim.surface(), Some(SurfaceSize::new(375.0, 667.0)));
    }

    #[test]
    fn idle_step_and_spawn_are_noops() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 2);
        assert!(!sim.step());
        assert_eq!(sim.spawn_text(), None);
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn reset_restores_fifty_and_clears_text() {
        let mut sim = running();
        for _ in 0..3 {
            sim.spawn_text();
        }
        sim.handle_touch(
            &TouchEvent::single(TouchPhase::Start, 20.0, 20.0, 0),
            &mut NoHaptics,
        );
        sim.reset();
        assert_eq!(sim.particles().len(), 50);
        assert!(sim.text_particles().is_empty());
        assert_eq!(sim.poll_long_press(10_000), None);
    }

    #[test]
    fn stop_clears_text_and_goes_idle() {
        let mut sim = running();
        sim.spawn_text();
        assert!(sim.stop());
        assert!(!sim.stop());
        assert!(sim.text_particles().is_empty());
        assert!(!sim.step());
    }

    #[test]
    fn text_count_never_exceeds_cap() {
        let mut sim = running();
        for _ in 0..20 {
            sim.spawn_text();
            assert!(sim.text_particles().len() <= 8);
        }
        assert_eq!(sim.text_particles().len(), 8);
    }

    #[test]
    fn touches_are_ignored_while_idle() {
        let mut sim = Simulation::with_seed(SimulationConfig::default(), 3);
        sim.handle_touch(
            &TouchEvent::single(TouchPhase::Start, 20.0, 20.0, 0),
            &mut NoHaptics,
        );
        assert!(sim.particles().is_empty());
    }

    #[test]
    fn resize_updates_bounds() {
        let mut sim = running();
        sim.resize(SurfaceSize::new(800.0, 600.0));
        assert_eq!(sim.pool().bounds(), Bounds::new(800.0, 600.0));
    }

    #[test]
    fn palette_is_shared_with_pool() {
        let sim = running();
        assert_eq!(sim.palette(), sim.pool().palette());
        for p in sim.particles() {
            assert!(sim.palette().colors().contains(&p.color));
        }
    }
}
