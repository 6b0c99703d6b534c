//! # Nebula Core
//!
//! Particle simulation behind the Nebula touch canvas.
//! Compiles to WASM for browser hosts and natively for the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Simulation                  │
//! ├─────────────────────────────────────────────┤
//! │  Particle Pool    │  Text Scheduler         │
//! │  - Spawn/burst    │  - Interval spawns      │
//! │  - Decay/floor    │  - Fade-in, drift       │
//! ├─────────────────────────────────────────────┤
//! │  Interaction      │  Platform traits        │
//! │  - Burst/stir     │  - Frames, timers       │
//! │  - Long press     │  - Haptics, notices     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod event;
pub mod interaction;
pub mod palette;
pub mod particle;
pub mod platform;
pub mod pool;
pub mod simulation;
pub mod surface;
pub mod text;

pub use config::SimulationConfig;
pub use error::{NebulaError, NebulaResult};
pub use event::{TouchEvent, TouchPhase, TouchPoint};
pub use interaction::{InteractionHandler, LongPress};
pub use palette::{Color, Palette, PaletteKind};
pub use particle::{Particle, ParticleOverrides, Shape};
pub use platform::{CallbackId, HapticIntensity, Haptics, NoHaptics, Notice, Platform};
pub use pool::ParticlePool;
pub use simulation::{LoopState, Simulation};
pub use surface::{Bounds, Point, SurfaceSize};
pub use text::{TextParticle, TextScheduler};

/// Nebula core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
