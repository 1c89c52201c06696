//! Error types for hyspec-core.

use thiserror::Error;

/// Result type alias for hyspec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for hyspec operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Pixel coordinate outside the band plane.
    #[error("invalid pixel coordinate: (row {row}, col {col})")]
    InvalidCoordinate { row: usize, col: usize },

    /// Band index outside the cube.
    #[error("band {band} out of range for cube with {count} bands")]
    BandOutOfRange { band: usize, count: usize },

    /// Cube with zero bands, rows, or columns.
    #[error("cube must have at least one band and a non-empty plane")]
    EmptyCube,

    /// Sample or plane count does not match the declared dimensions.
    #[error("shape mismatch: expected {expected} samples, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Region selection does not overlap the cube.
    #[error("selected region does not overlap the cube")]
    EmptyRegion,

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
