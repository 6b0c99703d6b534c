//! Scripted input for headless runs.
//!
//! A script is a JSON array of steps, each pinned to a frame index:
//!
//! ```json
//! [
//!   { "frame": 10, "action": "touch", "phase": "start", "x": 120, "y": 300 },
//!   { "frame": 12, "action": "touch", "phase": "move", "x": 140, "y": 310 },
//!   { "frame": 20, "action": "touch", "phase": "end", "x": 140, "y": 310 },
//!   { "frame": 90, "action": "reset" }
//! ]
//! ```

use std::path::Path;

use anyhow::Context;
use nebula_core::TouchPhase;
use serde::{Deserialize, Serialize};

/// What happens at a scripted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    /// A single-finger touch in logical canvas coordinates.
    Touch {
        /// Touch phase.
        phase: TouchPhase,
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
    },
    /// Reset the canvas.
    Reset,
    /// Change the logical canvas size.
    Resize {
        /// New width.
        width: f32,
        /// New height.
        height: f32,
    },
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Frame index the step fires on, before that frame renders.
    pub frame: u32,
    /// The action.
    #[serde(flatten)]
    pub action: ScriptAction,
}

/// An ordered input script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchScript {
    steps: Vec<ScriptStep>,
    cursor: usize,
}

impl TouchScript {
    /// Build a script; steps are ordered by frame, stable within a frame.
    #[must_use]
    pub fn new(mut steps: Vec<ScriptStep>) -> Self {
        steps.sort_by_key(|step| step.frame);
        Self { steps, cursor: 0 }
    }

    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of steps.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let steps: Vec<ScriptStep> =
            serde_json::from_str(json).context("Invalid touch script")?;
        Ok(Self::new(steps))
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Steps due at or before `frame` that have not been returned yet.
    pub fn due(&mut self, frame: u32) -> &[ScriptStep] {
        let start = self.cursor;
        while self
            .steps
            .get(self.cursor)
            .is_some_and(|step| step.frame <= frame)
        {
            self.cursor += 1;
        }
        &self.steps[start..self.cursor]
    }

    /// Total number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
