//! Spatial averaging filters over a single raw band plane.
//!
//! Both filters read the raw `f32` samples, never a rendered raster, and
//! produce a plane of the same shape. Edge windows are clipped to the plane
//! and averaged over the samples they actually cover.

use std::fmt;
use std::str::FromStr;

use hyspec_core::{Cube, Error, Normalizer, RenderedBand, Result, WavelengthAxis};
use ndarray::{s, Array2, ArrayView2, Zip};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::render::render_plane;

/// Block size used when none is configured.
const DEFAULT_BLOCK_SIZE: usize = 10;

/// Available spatial filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SpatialFilter {
    /// Non-overlapping `k`×`k` tiles, each replaced by its mean.
    Mosaic,
    /// Per-pixel mean of the `k`×`k` window whose top-left corner is the pixel.
    Box,
}

impl SpatialFilter {
    /// Lowercase name used on the command line and in config files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mosaic => "mosaic",
            Self::Box => "box",
        }
    }

    /// Run this filter over a plane.
    #[must_use]
    pub fn apply(self, plane: ArrayView2<'_, f32>, block_size: usize) -> Array2<f32> {
        match self {
            Self::Mosaic => mosaic_filter(plane, block_size),
            Self::Box => box_filter(plane, block_size),
        }
    }
}

impl fmt::Display for SpatialFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpatialFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mosaic" => Ok(Self::Mosaic),
            "box" | "blur" => Ok(Self::Box),
            other => Err(Error::ConfigError(format!("unknown filter '{other}'"))),
        }
    }
}

/// Configuration for the spatial filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Side length `k` of the averaging window, in pixels.
    pub block_size: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl FilterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the window size. A size of 0 is treated as 1.
    #[must_use]
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Effective window size, never less than 1.
    #[must_use]
    pub fn effective_block_size(&self) -> usize {
        self.block_size.max(1)
    }
}

/// Replace every `k`×`k` tile with its arithmetic mean.
///
/// Tiles start at `(0, 0)` and do not overlap; tiles on the right and bottom
/// edges are clipped to the plane. A `k` of 0 is treated as 1.
#[must_use]
pub fn mosaic_filter(plane: ArrayView2<'_, f32>, block_size: usize) -> Array2<f32> {
    let k = block_size.max(1);
    let (height, width) = plane.dim();
    let mut means = Array2::<f32>::zeros((height.div_ceil(k), width.div_ceil(k)));

    Zip::indexed(&mut means).par_for_each(|(br, bc), out| {
        let r0 = br * k;
        let c0 = bc * k;
        let r1 = (r0 + k).min(height);
        let c1 = (c0 + k).min(width);
        let mut sum = 0.0f64;
        for r in r0..r1 {
            for c in c0..c1 {
                sum += f64::from(plane[[r, c]]);
            }
        }
        *out = mean(sum, (r1 - r0) * (c1 - c0));
    });

    Array2::from_shape_fn((height, width), |(r, c)| means[[r / k, c / k]])
}

/// Forward-anchored sliding-window mean.
///
/// Output `(r, c)` is the mean of rows `r..r+k` and columns `c..c+k`, clipped
/// to the plane. The window is not centered on the pixel. A `k` of 0 is
/// treated as 1. A non-finite sample only affects the windows that contain it.
#[must_use]
pub fn box_filter(plane: ArrayView2<'_, f32>, block_size: usize) -> Array2<f32> {
    let k = block_size.max(1);
    let (height, width) = plane.dim();
    let tables = SummedArea::new(plane);
    let mut output = Array2::<f32>::zeros((height, width));

    Zip::indexed(&mut output).par_for_each(|(r, c), out| {
        let r1 = (r + k).min(height);
        let c1 = (c + k).min(width);
        let sum = if tables.non_finite(r, c, r1, c1) == 0 {
            tables.sum(r, c, r1, c1)
        } else {
            plane
                .slice(s![r..r1, c..c1])
                .iter()
                .map(|&v| f64::from(v))
                .sum::<f64>()
        };
        *out = mean(sum, (r1 - r) * (c1 - c));
    });

    output
}

/// Summed-area tables over a plane.
///
/// `sums[[r, c]]` holds the sum of the finite samples above and left of
/// `(r, c)`; `non_finite[[r, c]]` counts the NaN and infinite ones.
struct SummedArea {
    sums: Array2<f64>,
    non_finite: Array2<usize>,
}

impl SummedArea {
    fn new(plane: ArrayView2<'_, f32>) -> Self {
        let (height, width) = plane.dim();
        let mut sums = Array2::<f64>::zeros((height + 1, width + 1));
        let mut non_finite = Array2::<usize>::zeros((height + 1, width + 1));
        for r in 0..height {
            let mut row_sum = 0.0f64;
            let mut row_count = 0usize;
            for c in 0..width {
                let v = plane[[r, c]];
                if v.is_finite() {
                    row_sum += f64::from(v);
                } else {
                    row_count += 1;
                }
                sums[[r + 1, c + 1]] = sums[[r, c + 1]] + row_sum;
                non_finite[[r + 1, c + 1]] = non_finite[[r, c + 1]] + row_count;
            }
        }
        Self { sums, non_finite }
    }

    /// Sum of finite samples in rows `r0..r1`, columns `c0..c1`.
    fn sum(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> f64 {
        let t = &self.sums;
        t[[r1, c1]] - t[[r0, c1]] - t[[r1, c0]] + t[[r0, c0]]
    }

    /// Count of non-finite samples in rows `r0..r1`, columns `c0..c1`.
    fn non_finite(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> usize {
        let t = &self.non_finite;
        t[[r1, c1]] + t[[r0, c0]] - t[[r0, c1]] - t[[r1, c0]]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64) as f32
}

/// Filter one band of a cube.
///
/// # Errors
///
/// Returns [`Error::BandOutOfRange`] if `band` is outside the cube.
pub fn apply_filter(
    cube: &Cube,
    band: usize,
    filter: SpatialFilter,
    config: &FilterConfig,
) -> Result<Array2<f32>> {
    let plane = cube.try_band(band)?;
    Ok(filter.apply(plane, config.effective_block_size()))
}

/// Filter one band and render the result.
///
/// The filtered plane is normalized with the cube's global extrema, not its
/// own.
///
/// # Errors
///
/// Returns [`Error::BandOutOfRange`] if `band` is outside the cube.
pub fn render_filtered(
    cube: &Cube,
    band: usize,
    filter: SpatialFilter,
    config: &FilterConfig,
    axis: &WavelengthAxis,
) -> Result<RenderedBand> {
    let filtered = apply_filter(cube, band, filter, config)?;
    render_plane(
        filtered.view(),
        &Normalizer::from_cube(cube),
        band,
        axis.wavelength(band),
    )
}
