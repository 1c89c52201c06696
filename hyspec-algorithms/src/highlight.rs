//! Threshold highlighting.

use std::fmt;
use std::str::FromStr;

use hyspec_core::{Cube, Error, Normalizer, RenderedBand, Result, WavelengthAxis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::render::render_plane_with;

/// Which side of the threshold gets flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HighlightCondition {
    /// Flag samples strictly greater than the threshold.
    #[default]
    Above,
    /// Flag samples strictly less than the threshold.
    Below,
}

impl HighlightCondition {
    /// Whether `sample` is flagged against `threshold`.
    ///
    /// Comparisons are strict, so a sample equal to the threshold is never
    /// flagged. NaN samples are never flagged.
    #[must_use]
    pub fn matches(self, sample: f32, threshold: f32) -> bool {
        match self {
            Self::Above => sample > threshold,
            Self::Below => sample < threshold,
        }
    }
}

impl fmt::Display for HighlightCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Above => "above",
            Self::Below => "below",
        })
    }
}

impl FromStr for HighlightCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "above" | "greater" => Ok(Self::Above),
            "below" | "less" => Ok(Self::Below),
            other => Err(Error::ConfigError(format!(
                "unknown highlight condition '{other}'"
            ))),
        }
    }
}

/// Threshold and condition for [`highlight_band`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HighlightConfig {
    /// Raw sample value to compare against.
    pub threshold: f32,
    /// Side of the threshold to flag.
    pub condition: HighlightCondition,
}

impl HighlightConfig {
    /// Create a configuration.
    #[must_use]
    pub fn new(threshold: f32, condition: HighlightCondition) -> Self {
        Self {
            threshold,
            condition,
        }
    }
}

/// Render a band with flagged samples shown in red.
///
/// Flagged pixels keep their normalized intensity in the red channel with
/// green and blue at zero. Every other pixel renders as normal grayscale.
///
/// # Errors
///
/// Returns [`Error::BandOutOfRange`] if `band` is outside the cube.
pub fn highlight(
    cube: &Cube,
    band: usize,
    threshold: f32,
    condition: HighlightCondition,
    axis: &WavelengthAxis,
) -> Result<RenderedBand> {
    let plane = cube.try_band(band)?;
    let normalizer = Normalizer::from_cube(cube);
    render_plane_with(plane, band, axis.wavelength(band), |sample| {
        let v = normalizer.apply(sample);
        if condition.matches(sample, threshold) {
            [v, 0, 0]
        } else {
            [v, v, v]
        }
    })
}

/// [`highlight`] driven by a [`HighlightConfig`].
///
/// # Errors
///
/// Returns [`Error::BandOutOfRange`] if `band` is outside the cube.
pub fn highlight_band(
    cube: &Cube,
    band: usize,
    config: &HighlightConfig,
    axis: &WavelengthAxis,
) -> Result<RenderedBand> {
    highlight(cube, band, config.threshold, config.condition, axis)
}
