//! hyspec-algorithms: Raster and spectral algorithms over a hyperspectral cube.
//!
//! This crate provides:
//! - **Band rendering** - grayscale RGB rasters under the cube's global normalization
//! - **Spatial filters** - mosaic (block average) and box (forward window average)
//! - **Threshold highlighting** - red-flagging samples above or below a threshold
//! - **Spectral profiles** - per-band point values and region means
//!
#![warn(missing_docs)]

mod filter;
mod highlight;
mod profile;
mod render;

pub use filter::{apply_filter, box_filter, mosaic_filter, render_filtered, FilterConfig, SpatialFilter};
pub use highlight::{highlight, highlight_band, HighlightCondition, HighlightConfig};
pub use profile::{extract_point, extract_profile, extract_region};
pub use render::{render_band, render_plane, BandRenderer, GrayscaleRenderer};

// Re-export the core types every caller needs alongside the algorithms
pub use hyspec_core::{Cube, RenderedBand, SpectralProfile, WavelengthAxis};
