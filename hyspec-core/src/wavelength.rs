//! Band index to wavelength mapping.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear wavelength axis: `base_nm + band * increment_nm`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WavelengthAxis {
    /// Wavelength of band 0 in nanometres.
    pub base_nm: f64,
    /// Spacing between consecutive bands in nanometres.
    pub increment_nm: f64,
}

impl Default for WavelengthAxis {
    fn default() -> Self {
        Self {
            base_nm: 528.0,
            increment_nm: 4.0,
        }
    }
}

impl WavelengthAxis {
    /// Creates a new axis with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the wavelength of band 0.
    #[must_use]
    pub fn with_base_nm(mut self, base_nm: f64) -> Self {
        self.base_nm = base_nm;
        self
    }

    /// Sets the band spacing.
    #[must_use]
    pub fn with_increment_nm(mut self, increment_nm: f64) -> Self {
        self.increment_nm = increment_nm;
        self
    }

    /// Wavelength of a band in nanometres.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn wavelength(&self, band: usize) -> f64 {
        self.base_nm + band as f64 * self.increment_nm
    }

    /// Wavelengths for bands `0..band_count`.
    #[must_use]
    pub fn wavelengths(&self, band_count: usize) -> Vec<f64> {
        (0..band_count).map(|b| self.wavelength(b)).collect()
    }

    /// First and last wavelength for a cube with `band_count` bands.
    #[must_use]
    pub fn range(&self, band_count: usize) -> (f64, f64) {
        (
            self.wavelength(0),
            self.wavelength(band_count.saturating_sub(1)),
        )
    }
}
