//! Host collaborators: frame callbacks, interval timers, haptics, notices.
//!
//! Hosts implement [`Platform`] over whatever primitives they have
//! (`requestAnimationFrame` in a browser, a virtual clock in the CLI).

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::NebulaResult;

/// Strength tier for haptic feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticIntensity {
    /// Touch burst.
    Light,
    /// Reset.
    Medium,
    /// Long press.
    Heavy,
}

impl HapticIntensity {
    /// Vibration length for hosts that only take a duration.
    #[must_use]
    pub const fn pulse_ms(self) -> u32 {
        match self {
            Self::Light => 15,
            Self::Medium => 30,
            Self::Heavy => 60,
        }
    }
}

/// Fire-and-forget haptic feedback.
pub trait Haptics {
    /// Vibrate the device.
    ///
    /// # Errors
    ///
    /// Returns an error if the device refused; callers log and move on.
    fn vibrate(&mut self, intensity: HapticIntensity) -> NebulaResult<()>;
}

/// Haptics for hosts without a vibration motor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _intensity: HapticIntensity) -> NebulaResult<()> {
        Ok(())
    }
}

/// Trigger haptics, logging and swallowing failures.
pub fn pulse(haptics: &mut dyn Haptics, intensity: HapticIntensity) {
    if let Err(e) = haptics.vibrate(intensity) {
        tracing::warn!("Haptic feedback ({intensity:?}) failed: {e}");
    }
}

/// Handle returned by the host for a pending frame request or interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallbackId(pub i32);

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One-shot message surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Notice {
    /// A frame snapshot was exported.
    Saved(String),
    /// Exporting a snapshot failed.
    ExportFailed(String),
    /// The canvas was reset.
    Reset,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(location) => write!(f, "Saved to {location}"),
            Self::ExportFailed(reason) => write!(f, "Export failed: {reason}"),
            Self::Reset => f.write_str("Canvas reset"),
        }
    }
}

/// Scheduling and feedback primitives the frame loop needs from its host.
pub trait Platform: Haptics {
    /// Ask for one callback at the next display refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot schedule frames.
    fn request_frame(&mut self) -> NebulaResult<CallbackId>;

    /// Cancel a pending frame request.
    fn cancel_frame(&mut self, id: CallbackId);

    /// Start a repeating timer.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot create timers.
    fn start_interval(&mut self, period: Duration) -> NebulaResult<CallbackId>;

    /// Stop a repeating timer.
    fn cancel_interval(&mut self, id: CallbackId);

    /// Show a transient notification.
    fn notify(&mut self, notice: Notice) {
        tracing::info!("{notice}");
    }
}
