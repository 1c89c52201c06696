//! hyspec-core: Core types for hyperspectral cube browsing.
//!
//! This crate provides the in-memory cube, the global intensity normalizer,
//! the 8-bit raster type produced for display, and the plain state types
//! (navigation, selection, spectral profiles) that the rest of the
//! workspace passes around.
//!

pub mod cube;
pub mod error;
pub mod navigation;
pub mod normalize;
pub mod profile;
pub mod raster;
pub mod selection;
pub mod wavelength;

pub use cube::Cube;
pub use error::{Error, Result};
pub use navigation::NavigationState;
pub use normalize::{normalize, Normalizer, DEGENERATE_INTENSITY};
pub use profile::{ProfileSource, SpectralProfile};
pub use raster::{RasterBuffer, RenderedBand, CHANNELS};
pub use selection::{PixelCoord, Rect, SelectionRegion};
pub use wavelength::WavelengthAxis;
