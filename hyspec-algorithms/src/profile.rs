//! Spectral profile extraction from raw cube samples.

use hyspec_core::{
    Cube, Error, PixelCoord, ProfileSource, Rect, Result, SelectionRegion, SpectralProfile,
    WavelengthAxis,
};
use ndarray::s;
use rayon::prelude::*;

/// Per-band samples at one pixel.
///
/// # Errors
///
/// Returns [`Error::InvalidCoordinate`] if the pixel is outside the band plane.
pub fn extract_point(cube: &Cube, at: PixelCoord, axis: &WavelengthAxis) -> Result<SpectralProfile> {
    if !cube.contains(at.row, at.col) {
        return Err(Error::InvalidCoordinate {
            row: at.row,
            col: at.col,
        });
    }

    let values = cube
        .data()
        .slice(s![.., at.row, at.col])
        .iter()
        .map(|&v| f64::from(v))
        .collect();

    Ok(SpectralProfile::new(ProfileSource::Point(at), values, axis))
}

/// Per-band mean over a rectangle.
///
/// Bounds are inclusive on both corners. A rectangle that extends past the
/// plane is clipped first, and the profile records the clipped rectangle.
///
/// # Errors
///
/// Returns [`Error::EmptyRegion`] if the rectangle does not overlap the plane.
pub fn extract_region(cube: &Cube, rect: Rect, axis: &WavelengthAxis) -> Result<SpectralProfile> {
    let clipped = rect
        .clip_to(cube.width(), cube.height())
        .ok_or(Error::EmptyRegion)?;
    let (tl, br) = (clipped.top_left(), clipped.bottom_right());
    #[allow(clippy::cast_precision_loss)]
    let count = clipped.pixel_count() as f64;
    let data = cube.data();

    let values = (0..cube.band_count())
        .into_par_iter()
        .map(|band| {
            let window = data.slice(s![band, tl.row..=br.row, tl.col..=br.col]);
            window.iter().map(|&v| f64::from(v)).sum::<f64>() / count
        })
        .collect();

    Ok(SpectralProfile::new(
        ProfileSource::Region(clipped),
        values,
        axis,
    ))
}

/// Profile for the operator's current selection.
///
/// # Errors
///
/// See [`extract_point`] and [`extract_region`].
pub fn extract_profile(
    cube: &Cube,
    selection: &SelectionRegion,
    axis: &WavelengthAxis,
) -> Result<SpectralProfile> {
    match *selection {
        SelectionRegion::Point(at) => extract_point(cube, at, axis),
        SelectionRegion::Region(rect) => extract_region(cube, rect, axis),
    }
}
