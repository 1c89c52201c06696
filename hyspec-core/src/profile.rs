//! Spectral profile data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::selection::{PixelCoord, Rect};
use crate::wavelength::WavelengthAxis;

/// Where a profile was sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProfileSource {
    /// Single pixel values.
    Point(PixelCoord),
    /// Per-band mean over a rectangle.
    Region(Rect),
}

/// Per-band values for one pixel or region, paired with wavelengths.
///
/// Produced on demand and never persisted by the core.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpectralProfile {
    source: ProfileSource,
    values: Vec<f64>,
    wavelengths: Vec<f64>,
}

impl SpectralProfile {
    /// Pair per-band values with wavelengths from `axis`.
    #[must_use]
    pub fn new(source: ProfileSource, values: Vec<f64>, axis: &WavelengthAxis) -> Self {
        let wavelengths = axis.wavelengths(values.len());
        Self {
            source,
            values,
            wavelengths,
        }
    }

    #[must_use]
    pub fn source(&self) -> ProfileSource {
        self.source
    }

    /// Value for each band, in band order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Wavelength for each band, in band order.
    #[must_use]
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(wavelength, value)` pairs in band order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.wavelengths
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Column title describing the values, used by plots and tabular exports.
    ///
    /// Region corners are written as `(x, y)`, i.e. `(col, row)`.
    #[must_use]
    pub fn value_label(&self) -> String {
        match self.source {
            ProfileSource::Point(_) => "pixel value".to_string(),
            ProfileSource::Region(rect) => {
                let (tl, br) = (rect.top_left(), rect.bottom_right());
                format!(
                    "avg pixel value for area between ({}, {}) and ({}, {})",
                    tl.col, tl.row, br.col, br.row
                )
            }
        }
    }

    /// Plot title, e.g. `"Spectrum for (12, 40)"`.
    #[must_use]
    pub fn title(&self) -> String {
        match self.source {
            ProfileSource::Point(p) => format!("Spectrum for ({}, {})", p.col, p.row),
            ProfileSource::Region(rect) => {
                let (tl, br) = (rect.top_left(), rect.bottom_right());
                format!(
                    "Spectrum for area between ({}, {}) and ({}, {})",
                    tl.col, tl.row, br.col, br.row
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_wavelengths() {
        let p = SpectralProfile::new(
            ProfileSource::Point(PixelCoord::new(1, 2)),
            vec![10.0, 20.0, 30.0],
            &WavelengthAxis::default(),
        );
        let pts: Vec<_> = p.points().collect();
        assert_eq!(pts, vec![(528.0, 10.0), (532.0, 20.0), (536.0, 30.0)]);
        assert_eq!(p.value_label(), "pixel value");
        assert_eq!(p.title(), "Spectrum for (2, 1)");
    }

    #[test]
    fn test_region_label() {
        let rect = Rect::from_corners(PixelCoord::new(4, 1), PixelCoord::new(2, 3));
        let p = SpectralProfile::new(
            ProfileSource::Region(rect),
            vec![1.0],
            &WavelengthAxis::default(),
        );
        assert_eq!(
            p.value_label(),
            "avg pixel value for area between (1, 2) and (3, 4)"
        );
    }
}
