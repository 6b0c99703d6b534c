//! Error types for simulation operations.

use thiserror::Error;

/// Result type for simulation operations.
pub type NebulaResult<T> = Result<T, NebulaError>;

/// Errors that can occur around the simulation.
///
/// The simulation itself never fails; these describe failures of the
/// collaborators around it (platform timers, haptics, configuration).
#[derive(Debug, Error)]
pub enum NebulaError {
    /// A platform primitive (frame callback, interval timer) was unavailable.
    #[error("Platform error: {0}")]
    Platform(String),

    /// Haptic feedback could not be delivered.
    #[error("Haptic feedback failed: {0}")]
    Haptics(String),

    /// Configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
