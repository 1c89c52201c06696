//! Band rendering to 8-bit grayscale rasters.

use hyspec_core::{Cube, Normalizer, RasterBuffer, RenderedBand, Result, WavelengthAxis};
use ndarray::ArrayView2;

/// Trait for per-band raster producers.
///
/// The render pipeline drives an implementation of this trait over every
/// band of a cube. Implementations must be pure functions of the cube and
/// band index.
pub trait BandRenderer: Send + Sync {
    /// Renderer name.
    fn name(&self) -> &'static str;

    /// Render one band.
    ///
    /// # Errors
    ///
    /// Returns an error if `band` is outside the cube or the raster cannot
    /// be produced.
    fn render(&self, cube: &Cube, band: usize) -> Result<RenderedBand>;
}

/// Grayscale-as-RGB renderer using the cube's global extrema.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayscaleRenderer {
    axis: WavelengthAxis,
}

impl GrayscaleRenderer {
    /// Create a renderer labelling bands with `axis`.
    #[must_use]
    pub fn new(axis: WavelengthAxis) -> Self {
        Self { axis }
    }

    /// Wavelength axis used for band labels.
    #[must_use]
    pub fn axis(&self) -> &WavelengthAxis {
        &self.axis
    }
}

impl BandRenderer for GrayscaleRenderer {
    fn name(&self) -> &'static str {
        "grayscale"
    }

    fn render(&self, cube: &Cube, band: usize) -> Result<RenderedBand> {
        let plane = cube.try_band(band)?;
        render_plane(
            plane,
            &Normalizer::from_cube(cube),
            band,
            self.axis.wavelength(band),
        )
    }
}

/// Render one band of a cube.
///
/// Every sample is normalized against the cube's global min/max and written
/// to all three channels.
///
/// # Panics
///
/// Panics if `band >= cube.band_count()`. An out-of-range band here is a
/// caller bug; use [`BandRenderer::render`] for a checked call.
#[must_use]
pub fn render_band(cube: &Cube, band: usize, axis: &WavelengthAxis) -> RenderedBand {
    GrayscaleRenderer::new(*axis)
        .render(cube, band)
        .unwrap_or_else(|e| panic!("render_band: {e}"))
}

/// Render an arbitrary `(height, width)` sample plane in grayscale.
///
/// Used for band planes and for derived planes (e.g. filter output) that
/// must share the cube's normalization.
///
/// # Errors
///
/// Propagates raster buffer errors.
pub fn render_plane(
    plane: ArrayView2<'_, f32>,
    normalizer: &Normalizer,
    band_index: usize,
    wavelength_nm: f64,
) -> Result<RenderedBand> {
    render_plane_with(plane, band_index, wavelength_nm, |sample| {
        let v = normalizer.apply(sample);
        [v, v, v]
    })
}

/// Render a plane with a per-sample colour function.
pub(crate) fn render_plane_with<F>(
    plane: ArrayView2<'_, f32>,
    band_index: usize,
    wavelength_nm: f64,
    color: F,
) -> Result<RenderedBand>
where
    F: Fn(f32) -> [u8; 3],
{
    let (height, width) = plane.dim();
    let mut buffer = RasterBuffer::new(width, height);
    for ((row, col), &sample) in plane.indexed_iter() {
        buffer.set_rgb(row, col, color(sample))?;
    }
    Ok(RenderedBand::new(band_index, wavelength_nm, buffer))
}
