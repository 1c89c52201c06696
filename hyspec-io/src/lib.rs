//! hyspec-io: Cube loading and export for hyspec.
//!
//! Loading goes through the [`CubeLoader`] trait. The HDF5 implementation is
//! behind the `hdf5` feature. Rendered bands export to PNG and spectral
//! profiles to CSV.
//!

mod error;
mod export;
mod loader;

pub use error::{Error, Result};
pub use export::{write_profile_csv, write_raster_png, ProfileCsvWriter};
#[cfg(feature = "hdf5")]
pub use loader::Hdf5CubeLoader;
pub use loader::{CubeLoader, DEFAULT_DATASET_PATHS};
