//! Viewer error types.

use thiserror::Error;

/// Result type for viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Viewer error types.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A render run is active; cancel it before starting another.
    #[error("a render run is already in progress")]
    PipelineBusy,

    /// The operation needs a loaded cube.
    #[error("no cube loaded")]
    NoCube,

    /// The operation needs a point or region selection.
    #[error("no pixel or region selected")]
    NoSelection,

    /// The render run ended in failure.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Malformed configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// OS-level I/O error (thread spawn, config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] hyspec_core::Error),
}
