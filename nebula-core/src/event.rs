//! Touch input events.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Point;

/// Phase of a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// Touch started (finger down).
    Start,
    /// Touch moved (finger dragging).
    Move,
    /// Touch ended (finger up).
    End,
    /// Touch cancelled by the platform.
    Cancel,
}

impl FromStr for TouchPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" | "began" | "down" => Ok(Self::Start),
            "move" | "moved" => Ok(Self::Move),
            "end" | "ended" | "up" => Ok(Self::End),
            "cancel" | "cancelled" => Ok(Self::Cancel),
            other => Err(format!("unknown touch phase '{other}'")),
        }
    }
}

/// A single touch point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Touch identifier.
    pub id: u32,
    /// X position in logical canvas coordinates.
    pub x: f32,
    /// Y position in logical canvas coordinates.
    pub y: f32,
}

impl TouchPoint {
    /// Position of this contact.
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A touch event with one or more touch points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    /// Phase of this touch event.
    pub phase: TouchPhase,
    /// All current touch points.
    pub touches: Vec<TouchPoint>,
    /// Timestamp in milliseconds on the host's frame clock.
    pub timestamp_ms: u64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>, timestamp_ms: u64) -> Self {
        Self {
            phase,
            touches,
            timestamp_ms,
        }
    }

    /// A single-contact event.
    #[must_use]
    pub fn single(phase: TouchPhase, x: f32, y: f32, timestamp_ms: u64) -> Self {
        Self::new(phase, vec![TouchPoint { id: 0, x, y }], timestamp_ms)
    }

    /// Get the primary (first) touch point; the only one the canvas reads.
    #[must_use]
    pub fn primary_touch(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }
}
