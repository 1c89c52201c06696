//! In-memory hyperspectral cube.
//!
//! A `Cube` stores every band plane of one loaded image in a single
//! `Array3<f32>` indexed by `[band, row, col]`, together with the global
//! sample extrema used for display normalization.

use ndarray::{Array3, ArrayView2, ArrayView3, Axis};

use crate::error::{Error, Result};

/// A 3D stack of registered monochrome bands indexed by (band, row, col).
///
/// The cube is immutable once constructed. Opening a new source replaces
/// the whole value rather than mutating it, so a `Cube` can be shared
/// across threads behind an `Arc` without locking.
///
/// # Memory Layout
///
/// Data is stored in row-major order: `data[band * height * width + row * width + col]`.
/// A 78-band 1024 × 1024 cube takes roughly 327 MB.
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    /// Samples with shape `(bands, height, width)`.
    data: Array3<f32>,

    /// Smallest finite sample across all bands.
    min_value: f32,

    /// Largest finite sample across all bands.
    max_value: f32,
}

impl Cube {
    /// Build a cube from a `(bands, height, width)` array.
    ///
    /// Global extrema are computed over finite samples only. A cube with no
    /// finite samples gets `min_value == max_value == 0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCube`] if any dimension is zero.
    pub fn new(data: Array3<f32>) -> Result<Self> {
        let (bands, height, width) = data.dim();
        if bands == 0 || height == 0 || width == 0 {
            return Err(Error::EmptyCube);
        }

        let (min_value, max_value) = finite_extrema(data.iter().copied()).unwrap_or((0.0, 0.0));

        Ok(Self {
            data,
            min_value,
            max_value,
        })
    }

    /// Build a cube from per-band row-major planes.
    ///
    /// # Arguments
    ///
    /// * `width` - Columns per band plane
    /// * `height` - Rows per band plane
    /// * `bands` - One `width * height` sample vector per band
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCube`] for zero dimensions and
    /// [`Error::ShapeMismatch`] if any plane has the wrong length.
    pub fn from_bands(width: usize, height: usize, bands: &[Vec<f32>]) -> Result<Self> {
        if bands.is_empty() || width == 0 || height == 0 {
            return Err(Error::EmptyCube);
        }

        let plane = width * height;
        let mut flat = Vec::with_capacity(plane * bands.len());
        for band in bands {
            if band.len() != plane {
                return Err(Error::ShapeMismatch {
                    expected: plane,
                    actual: band.len(),
                });
            }
            flat.extend_from_slice(band);
        }

        Self::from_flat(bands.len(), height, width, flat)
    }

    /// Build a cube from a flat `(bands, height, width)` row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyCube`] for zero dimensions and
    /// [`Error::ShapeMismatch`] if `samples.len()` disagrees with the shape.
    pub fn from_flat(bands: usize, height: usize, width: usize, samples: Vec<f32>) -> Result<Self> {
        let expected = bands * height * width;
        if expected == 0 {
            return Err(Error::EmptyCube);
        }
        if samples.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        let actual = samples.len();
        let data = Array3::from_shape_vec((bands, height, width), samples)
            .map_err(|_| Error::ShapeMismatch { expected, actual })?;
        Self::new(data)
    }

    /// Get the number of bands.
    #[must_use]
    #[inline]
    pub fn band_count(&self) -> usize {
        self.data.dim().0
    }

    /// Get the number of rows per band plane.
    #[must_use]
    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    /// Get the number of columns per band plane.
    #[must_use]
    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    /// Smallest finite sample in the cube.
    #[must_use]
    #[inline]
    pub fn min_value(&self) -> f32 {
        self.min_value
    }

    /// Largest finite sample in the cube.
    #[must_use]
    #[inline]
    pub fn max_value(&self) -> f32 {
        self.max_value
    }

    /// Get the sample at a position.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds. Use [`Cube::get`] for a
    /// checked lookup.
    #[must_use]
    #[inline]
    pub fn sample(&self, band: usize, row: usize, col: usize) -> f32 {
        self.data[[band, row, col]]
    }

    /// Get the sample at a position, or `None` if out of bounds.
    #[must_use]
    #[inline]
    pub fn get(&self, band: usize, row: usize, col: usize) -> Option<f32> {
        self.data.get([band, row, col]).copied()
    }

    /// Whether `(row, col)` lies inside the band plane.
    #[must_use]
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width()
    }

    /// Validate a band index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BandOutOfRange`] if `band >= band_count()`.
    pub fn check_band(&self, band: usize) -> Result<()> {
        if band < self.band_count() {
            Ok(())
        } else {
            Err(Error::BandOutOfRange {
                band,
                count: self.band_count(),
            })
        }
    }

    /// Borrow one band plane as a `(height, width)` view.
    ///
    /// # Panics
    ///
    /// Panics if `band` is out of range.
    #[must_use]
    pub fn band(&self, band: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(0), band)
    }

    /// Borrow one band plane, checking the index first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BandOutOfRange`] if `band` is out of range.
    pub fn try_band(&self, band: usize) -> Result<ArrayView2<'_, f32>> {
        self.check_band(band)?;
        Ok(self.band(band))
    }

    /// Borrow the full sample volume.
    #[must_use]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }
}

/// Min and max over the finite values of an iterator.
fn finite_extrema(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_cube(bands: usize, height: usize, width: usize) -> Cube {
        #[allow(clippy::cast_precision_loss)]
        let samples = (0..bands * height * width).map(|i| i as f32).collect();
        Cube::from_flat(bands, height, width, samples).unwrap()
    }

    #[test]
    fn test_dimensions_and_extrema() {
        let cube = ramp_cube(3, 2, 4);
        assert_eq!(cube.band_count(), 3);
        assert_eq!(cube.height(), 2);
        assert_eq!(cube.width(), 4);
        assert_eq!(cube.min_value(), 0.0);
        assert_eq!(cube.max_value(), 23.0);
    }

    #[test]
    fn test_row_major_indexing() {
        let cube = ramp_cube(2, 3, 4);
        // band 1, row 2, col 3 -> 1*12 + 2*4 + 3
        assert_eq!(cube.sample(1, 2, 3), 23.0);
        assert_eq!(cube.get(0, 1, 0), Some(4.0));
        assert_eq!(cube.get(2, 0, 0), None);
        assert_eq!(cube.get(0, 3, 0), None);
        assert_eq!(cube.get(0, 0, 4), None);
    }

    #[test]
    fn test_band_view() {
        let cube = ramp_cube(2, 2, 2);
        let plane = cube.band(1);
        assert_eq!(plane.dim(), (2, 2));
        assert_eq!(plane[[1, 0]], 6.0);
        assert!(cube.try_band(2).is_err());
    }

    #[test]
    fn test_from_bands() {
        let cube = Cube::from_bands(2, 2, &[vec![0.0, 50.0, 100.0, 25.0], vec![1.0; 4]]).unwrap();
        assert_eq!(cube.band_count(), 2);
        assert_eq!(cube.sample(0, 1, 0), 100.0);
        assert_eq!(cube.max_value(), 100.0);
    }

    #[test]
    fn test_from_bands_shape_mismatch() {
        let err = Cube::from_bands(2, 2, &[vec![0.0; 4], vec![0.0; 3]]).unwrap_err();
        assert_eq!(
            err,
            Error::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_empty_cube_rejected() {
        assert_eq!(Cube::from_bands(2, 2, &[]).unwrap_err(), Error::EmptyCube);
        assert_eq!(
            Cube::new(Array3::zeros((1, 0, 4))).unwrap_err(),
            Error::EmptyCube
        );
    }

    #[test]
    fn test_extrema_skip_non_finite() {
        let cube = Cube::from_bands(2, 1, &[vec![f32::NAN, 3.0], vec![-2.0, f32::INFINITY]]).unwrap();
        assert_eq!(cube.min_value(), -2.0);
        assert_eq!(cube.max_value(), 3.0);
    }

    #[test]
    fn test_check_band() {
        let cube = ramp_cube(3, 1, 1);
        assert!(cube.check_band(2).is_ok());
        assert_eq!(
            cube.check_band(3).unwrap_err(),
            Error::BandOutOfRange { band: 3, count: 3 }
        );
    }
}
