//! Text overlay nodes.
//!
//! Text particles are not rasterized; hosts lay them out as positioned text
//! above the canvas. This module turns simulation state into plain nodes a
//! host can apply directly.

use nebula_core::{Simulation, TextParticle};
use serde::{Deserialize, Serialize};

/// A positioned, styled text node for the host overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    /// Stable id of the source text particle.
    pub id: u64,
    /// Text content.
    pub text: String,
    /// Left offset in logical pixels.
    pub left: f32,
    /// Top offset in logical pixels.
    pub top: f32,
    /// CSS color string.
    pub color: String,
    /// Font size in logical pixels.
    pub font_size: f32,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl From<&TextParticle> for TextNode {
    fn from(particle: &TextParticle) -> Self {
        Self {
            id: particle.id,
            text: particle.text.clone(),
            left: particle.x,
            top: particle.y,
            color: particle.color.as_str().to_string(),
            font_size: particle.size,
            opacity: particle.opacity.clamp(0.0, 1.0),
        }
    }
}

/// Overlay nodes for every live text particle, in spawn order.
#[must_use]
pub fn text_nodes(simulation: &Simulation) -> Vec<TextNode> {
    simulation.text_particles().iter().map(TextNode::from).collect()
}
