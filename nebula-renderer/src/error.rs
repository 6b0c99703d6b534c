//! Renderer error types.

use nebula_core::NebulaError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while binding surfaces, drawing or exporting.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Surface creation or a drawing call failed.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Snapshot export failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Writing an exported file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A platform collaborator failed.
    #[error(transparent)]
    Core(#[from] NebulaError),
}
