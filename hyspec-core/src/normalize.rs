//! Global intensity normalization.
//!
//! Every raster in the workspace (band renders, filtered planes, threshold
//! highlights) maps raw samples to display intensity through [`normalize`]
//! with the cube's global extrema, so all views agree on brightness.

use crate::cube::Cube;

/// Intensity returned for every sample when the cube has no usable range.
pub const DEGENERATE_INTENSITY: u8 = 0;

const MAX_INTENSITY: f64 = 255.0;

/// Map a raw sample to an 8-bit intensity.
///
/// Computes `round((sample - min) / (max - min) * 255)` clamped to `[0, 255]`.
/// Samples outside `[min, max]` saturate at the ends of the range.
///
/// Returns [`DEGENERATE_INTENSITY`] when `max <= min`, when the range is not
/// finite, or when `sample` is NaN.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn normalize(sample: f32, min: f32, max: f32) -> u8 {
    let sample = f64::from(sample);
    let min = f64::from(min);
    let range = f64::from(max) - min;

    if !range.is_finite() || range <= 0.0 || sample.is_nan() {
        return DEGENERATE_INTENSITY;
    }

    let scaled = (sample - min) / range * MAX_INTENSITY;
    scaled.round().clamp(0.0, MAX_INTENSITY) as u8
}

/// Normalizer bound to a fixed `(min, max)` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    min: f32,
    max: f32,
}

impl Normalizer {
    /// Create a normalizer for an explicit range.
    #[must_use]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Create a normalizer using the cube's global extrema.
    #[must_use]
    pub fn from_cube(cube: &Cube) -> Self {
        Self::new(cube.min_value(), cube.max_value())
    }

    /// Map a sample to display intensity.
    #[must_use]
    #[inline]
    pub fn apply(&self, sample: f32) -> u8 {
        normalize(sample, self.min, self.max)
    }

    /// Whether every sample maps to [`DEGENERATE_INTENSITY`].
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        let range = f64::from(self.max) - f64::from(self.min);
        !range.is_finite() || range <= 0.0
    }

    /// Lower bound of the range.
    #[must_use]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound of the range.
    #[must_use]
    pub fn max(&self) -> f32 {
        self.max
    }
}
