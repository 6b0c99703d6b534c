//! Floating text glyphs and the interval scheduler that spawns them.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::particle::uniform;
use crate::{Bounds, Color, Palette, SimulationConfig};

/// Phrases and glyphs a text particle can show.
pub const VOCABULARY: [&str; 31] = [
    "梦", "雾", "光", "影", "尘", "风", "雨", "雪",
    "流逝", "碎片", "褶皱", "飘浮", "沉没", "绽放",
    "⌘", "⎔", "⎊", "∞", "◇", "○", "△", "□",
    "霎那", "永恒", "虚无", "存在", "混沌",
    "像风一样", "时光倒流", "星云破碎", "寂静回响",
];

/// Per-axis velocity range for text particles.
pub const TEXT_VELOCITY_RANGE: (f32, f32) = (-0.5, 0.5);
/// Font size range.
pub const FONT_SIZE_RANGE: (f32, f32) = (14.0, 34.0);
/// Range of the opacity a text particle fades in to.
pub const TARGET_OPACITY_RANGE: (f32, f32) = (0.4, 1.0);

const OPACITY_SNAP: f32 = 1e-4;

/// A floating text glyph rendered by the host overlay layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParticle {
    /// Session-unique, monotonically increasing id.
    pub id: u64,
    /// Displayed text.
    pub text: String,
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// X velocity.
    pub vx: f32,
    /// Y velocity.
    pub vy: f32,
    /// Text color.
    pub color: Color,
    /// Font size in logical pixels.
    pub size: f32,
    /// Current opacity.
    pub opacity: f32,
    /// Opacity the particle fades in to.
    pub target_opacity: f32,
}

impl TextParticle {
    /// Advance one frame: drift, bounce without damping, fade in.
    pub fn update(&mut self, bounds: Bounds, opacity_step: f32) {
        self.x += self.vx;
        self.y += self.vy;

        if bounds.outside_x(self.x) {
            self.vx = -self.vx;
        }
        if bounds.outside_y(self.y) {
            self.vy = -self.vy;
        }

        if self.opacity < self.target_opacity {
            let next = self.opacity + opacity_step;
            // Accumulated float steps land a hair short of the target; snap.
            self.opacity = if self.target_opacity - next <= OPACITY_SNAP {
                self.target_opacity
            } else {
                next
            };
        }
    }
}

/// Owns the live text particles and spawns one per interval up to a cap.
#[derive(Debug, Clone)]
pub struct TextScheduler {
    particles: Vec<TextParticle>,
    next_id: u64,
    config: SimulationConfig,
    rng: StdRng,
}

impl TextScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new(config: SimulationConfig, rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            next_id: 0,
            config,
            rng,
        }
    }

    /// Spawn one text particle unless the cap is reached.
    ///
    /// Positions are drawn from the canvas inset by the configured margin;
    /// a canvas too small for the margin collapses that axis to a 1px band.
    pub fn tick(&mut self, bounds: Bounds, palette: &Palette) -> Option<u64> {
        if self.particles.len() >= self.config.max_text_particles {
            tracing::trace!("Text particle cap reached ({})", self.particles.len());
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;

        let margin = self.config.text_margin;
        let rng = &mut self.rng;
        let text = VOCABULARY.choose(rng).copied().unwrap_or("∞");
        let x = uniform(rng, margin, (bounds.width - margin).max(margin + 1.0));
        let y = uniform(rng, margin, (bounds.height - margin).max(margin + 1.0));

        let particle = TextParticle {
            id,
            text: text.to_string(),
            x,
            y,
            vx: uniform(rng, TEXT_VELOCITY_RANGE.0, TEXT_VELOCITY_RANGE.1),
            vy: uniform(rng, TEXT_VELOCITY_RANGE.0, TEXT_VELOCITY_RANGE.1),
            color: palette.pick(rng),
            size: uniform(rng, FONT_SIZE_RANGE.0, FONT_SIZE_RANGE.1),
            opacity: 0.0,
            target_opacity: uniform(rng, TARGET_OPACITY_RANGE.0, TARGET_OPACITY_RANGE.1),
        };

        tracing::debug!("Spawned text particle {id} '{}'", particle.text);
        self.particles.push(particle);
        Some(id)
    }

    /// Advance every text particle by one frame.
    pub fn update(&mut self, bounds: Bounds) {
        let step = self.config.opacity_step;
        for particle in &mut self.particles {
            particle.update(bounds, step);
        }
    }

    /// Remove every text particle. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Live text particles, oldest first.
    #[must_use]
    pub fn particles(&self) -> &[TextParticle] {
        &self.particles
    }

    /// Number of live text particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no text particle is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn scheduler() -> TextScheduler {
        TextScheduler::new(SimulationConfig::default(), StdRng::seed_from_u64(42))
    }

    fn glyph(target_opacity: f32) -> TextParticle {
        TextParticle {
            id: 0,
            text: "光".to_string(),
            x: 100.0,
            y: 100.0,
            vx: 0.0,
            vy: 0.0,
            color: Color::default(),
            size: 20.0,
            opacity: 0.0,
            target_opacity,
        }
    }

    #[test]
    fn tick_spawns_within_inset() {
        let mut s = scheduler();
        let bounds = Bounds::new(375.0, 667.0);
        for _ in 0..8 {
            s.tick(bounds, &Palette::default());
        }
        for p in s.particles() {
            assert!((50.0..325.0).contains(&p.x));
            assert!((50.0..617.0).contains(&p.y));
            assert!((TEXT_VELOCITY_RANGE.0..TEXT_VELOCITY_RANGE.1).contains(&p.vx));
            assert!((TARGET_OPACITY_RANGE.0..TARGET_OPACITY_RANGE.1).contains(&p.target_opacity));
            assert_eq!(p.opacity, 0.0);
            assert!(VOCABULARY.contains(&p.text.as_str()));
        }
    }

    #[test]
    fn ids_increase_and_cap_holds() {
        let mut s = scheduler();
        let bounds = Bounds::new(400.0, 400.0);
        let ids: Vec<_> = (0..12)
            .filter_map(|_| s.tick(bounds, &Palette::default()))
            .collect();
        assert_eq!(ids, (0..8).collect::<Vec<u64>>());
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn ids_survive_clear() {
        let mut s = scheduler();
        let bounds = Bounds::new(400.0, 400.0);
        s.tick(bounds, &Palette::default());
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.tick(bounds, &Palette::default()), Some(1));
    }

    #[test]
    fn tiny_canvas_collapses_to_margin_band() {
        let mut s = scheduler();
        s.tick(Bounds::new(40.0, 0.0), &Palette::default());
        let p = &s.particles()[0];
        assert!((50.0..51.0).contains(&p.x));
        assert!((50.0..51.0).contains(&p.y));
    }

    #[test]
    fn opacity_reaches_target_exactly() {
        let mut p = glyph(0.6);
        for _ in 0..30 {
            let before = p.opacity;
            p.update(Bounds::new(400.0, 400.0), 0.02);
            assert!(p.opacity >= before);
            assert!(p.opacity <= p.target_opacity);
        }
        assert_eq!(p.opacity, 0.6);
    }

    #[test]
    fn opacity_never_overshoots() {
        let mut p = glyph(0.41);
        for _ in 0..100 {
            p.update(Bounds::new(400.0, 400.0), 0.02);
        }
        assert_eq!(p.opacity, 0.41);
    }

    #[test]
    fn bounce_inverts_without_damping() {
        let mut p = glyph(1.0);
        p.x = 399.8;
        p.vx = 0.4;
        p.update(Bounds::new(400.0, 400.0), 0.02);
        assert!((p.vx + 0.4).abs() < 1e-6);
    }
}
