//! Touch handling: bursts on contact, drags stir nearby particles, and a
//! held touch becomes a long press.

use crate::platform::Haptics;
use crate::{ParticlePool, Point, SimulationConfig, TouchEvent, TouchPhase};

/// A completed long press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LongPress {
    /// Where the press started.
    pub origin: Point,
    /// How long the touch was held when the press fired.
    pub held_ms: u64,
}

/// Single-shot, cancellable long-press deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LongPressTimer {
    armed: Option<(Point, u64)>,
}

impl LongPressTimer {
    fn arm(&mut self, origin: Point, now_ms: u64) {
        self.armed = Some((origin, now_ms));
    }

    fn disarm(&mut self) {
        self.armed = None;
    }

    fn poll(&mut self, now_ms: u64, threshold_ms: u64) -> Option<LongPress> {
        let (origin, armed_at) = self.armed?;
        let held_ms = now_ms.saturating_sub(armed_at);
        if held_ms < threshold_ms {
            return None;
        }
        self.disarm();
        Some(LongPress { origin, held_ms })
    }
}

/// Translates touch events into pool mutations.
#[derive(Debug, Clone)]
pub struct InteractionHandler {
    last_touch: Option<Point>,
    long_press: LongPressTimer,
    config: SimulationConfig,
}

impl InteractionHandler {
    /// Create a handler with no active touch.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            last_touch: None,
            long_press: LongPressTimer::default(),
            config,
        }
    }

    /// Dispatch an event by phase, reading only the primary contact.
    pub fn handle(
        &mut self,
        event: &TouchEvent,
        pool: &mut ParticlePool,
        haptics: &mut dyn Haptics,
    ) {
        match event.phase {
            TouchPhase::Start | TouchPhase::Move => {
                let Some(touch) = event.primary_touch() else {
                    tracing::trace!("Touch event without contacts ignored");
                    return;
                };
                if event.phase == TouchPhase::Start {
                    self.touch_start(pool, haptics, touch.x, touch.y, event.timestamp_ms);
                } else {
                    self.touch_move(pool, touch.x, touch.y);
                }
            }
            TouchPhase::End | TouchPhase::Cancel => self.touch_end(),
        }
    }

    /// Finger down: remember the point, burst, arm the long press.
    pub fn touch_start(
        &mut self,
        pool: &mut ParticlePool,
        haptics: &mut dyn Haptics,
        x: f32,
        y: f32,
        now_ms: u64,
    ) {
        let point = Point::new(x, y);
        self.last_touch = Some(point);
        pool.burst(x, y, self.config.burst_count, haptics);
        self.long_press.arm(point, now_ms);
    }

    /// Finger drag: stir particles near the pointer by its displacement.
    ///
    /// A move with no preceding start is ignored.
    pub fn touch_move(&mut self, pool: &mut ParticlePool, x: f32, y: f32) -> usize {
        let Some(last) = self.last_touch else {
            return 0;
        };
        let affected = pool.perturb(x, y, x - last.x, y - last.y, self.config.perturb_radius);
        self.last_touch = Some(Point::new(x, y));
        affected
    }

    /// Finger up: cancel a pending long press.
    pub fn touch_end(&mut self) {
        self.long_press.disarm();
        self.last_touch = None;
    }

    /// Fire the long press if the touch has been held long enough.
    pub fn poll(&mut self, now_ms: u64) -> Option<LongPress> {
        let press = self.long_press.poll(now_ms, self.config.long_press_ms)?;
        tracing::debug!(
            "Long press at ({:.1}, {:.1}) after {}ms",
            press.origin.x,
            press.origin.y,
            press.held_ms
        );
        Some(press)
    }

    /// Whether a long press is pending.
    #[must_use]
    pub fn long_press_armed(&self) -> bool {
        self.long_press.armed.is_some()
    }

    /// Drop any touch state.
    pub fn clear(&mut self) {
        self.touch_end();
    }
}
