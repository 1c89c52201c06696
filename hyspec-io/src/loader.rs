//! Cube loading.

use std::path::Path;

use hyspec_core::Cube;

#[cfg(feature = "hdf5")]
use hdf5::File;
#[cfg(feature = "hdf5")]
use log::{debug, info};

use crate::{Error, Result};

/// Dataset paths probed in order when opening an HDF5 cube.
pub const DEFAULT_DATASET_PATHS: &[&str] = &[
    "{50e35494-f4dd-4122-96f8-4d47c927abe5}/resultarray/inputdata",
    "inputdata",
    "Cube/resultarray/inputdata",
];

/// Source of hyperspectral cubes.
///
/// Implementations produce a complete, validated [`Cube`] or an error;
/// partial cubes are never returned.
pub trait CubeLoader: Send + Sync {
    /// Load the cube stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or holds no usable cube.
    fn load(&self, path: &Path) -> Result<Cube>;
}

/// Loads cubes from HDF5 files.
///
/// The first dataset path that exists in the file is used. Samples of any
/// numeric type are converted to `f32`.
#[cfg(feature = "hdf5")]
#[derive(Debug, Clone)]
pub struct Hdf5CubeLoader {
    dataset_paths: Vec<String>,
}

#[cfg(feature = "hdf5")]
impl Default for Hdf5CubeLoader {
    fn default() -> Self {
        Self {
            dataset_paths: DEFAULT_DATASET_PATHS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[cfg(feature = "hdf5")]
impl Hdf5CubeLoader {
    /// Loader probing [`DEFAULT_DATASET_PATHS`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the probed dataset paths.
    #[must_use]
    pub fn with_dataset_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dataset_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Dataset paths probed, in order.
    #[must_use]
    pub fn dataset_paths(&self) -> &[String] {
        &self.dataset_paths
    }
}

#[cfg(feature = "hdf5")]
impl CubeLoader for Hdf5CubeLoader {
    fn load(&self, path: &Path) -> Result<Cube> {
        let file = File::open(path)?;

        let (name, dataset) = self
            .dataset_paths
            .iter()
            .find_map(|name| file.dataset(name).ok().map(|ds| (name, ds)))
            .ok_or_else(|| Error::DatasetNotFound(self.dataset_paths.join(", ")))?;

        let shape = dataset.shape();
        debug!("dataset {name} has shape {shape:?}");
        let (bands, height, width) = cube_dims(&shape)?;

        let samples = dataset.read_raw::<f32>()?;
        let cube = Cube::from_flat(bands, height, width, samples)?;
        info!(
            "loaded {} from {}: {bands} bands of {width}x{height}",
            name,
            path.display()
        );
        Ok(cube)
    }
}

/// Interpret a dataset shape as `(bands, height, width)`.
///
/// Accepts 3-D shapes, and 4-D shapes where axis 0 or axis 1 is a singleton.
#[cfg_attr(not(feature = "hdf5"), allow(dead_code))]
fn cube_dims(shape: &[usize]) -> Result<(usize, usize, usize)> {
    match *shape {
        [b, h, w] => Ok((b, h, w)),
        [1, b, h, w] | [b, 1, h, w] => Ok((b, h, w)),
        _ => Err(Error::InvalidFormat(format!(
            "cube dataset must be 3-D (bands, rows, cols), got shape {shape:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_dims() {
        assert_eq!(cube_dims(&[78, 512, 640]).unwrap(), (78, 512, 640));
        assert_eq!(cube_dims(&[78, 1, 512, 640]).unwrap(), (78, 512, 640));
        assert_eq!(cube_dims(&[1, 78, 512, 640]).unwrap(), (78, 512, 640));
        assert!(matches!(
            cube_dims(&[512, 640]),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(
            cube_dims(&[2, 3, 512, 640]),
            Err(Error::InvalidFormat(_))
        ));
    }

    #[cfg(feature = "hdf5")]
    mod hdf5_files {
        use super::super::*;
        use hdf5::File;
        use tempfile::NamedTempFile;

        fn write_cube(path: &Path, group_path: &[&str], shape: &[usize], samples: &[f32]) {
            let file = File::create(path).unwrap();
            let mut group = file.group("/").unwrap();
            for name in group_path {
                group = group.create_group(name).unwrap();
            }
            let ds = group
                .new_dataset::<f32>()
                .shape(shape.to_vec())
                .create("inputdata")
                .unwrap();
            ds.write_raw(samples).unwrap();
        }

        #[test]
        fn test_load_legacy_nested_path() {
            let tmp = NamedTempFile::new().unwrap();
            let samples: Vec<f32> = (0..24).map(|v| v as f32).collect();
            write_cube(tmp.path(), &["Cube", "resultarray"], &[2, 3, 4], &samples);

            let cube = Hdf5CubeLoader::new().load(tmp.path()).unwrap();
            assert_eq!(cube.band_count(), 2);
            assert_eq!(cube.height(), 3);
            assert_eq!(cube.width(), 4);
            assert_eq!(cube.sample(1, 2, 3), 23.0);
            assert_eq!(cube.min_value(), 0.0);
            assert_eq!(cube.max_value(), 23.0);
        }

        #[test]
        fn test_load_singleton_axis() {
            let tmp = NamedTempFile::new().unwrap();
            let samples: Vec<f32> = (0..12).map(|v| v as f32).collect();
            write_cube(tmp.path(), &[], &[3, 1, 2, 2], &samples);

            let cube = Hdf5CubeLoader::new().load(tmp.path()).unwrap();
            assert_eq!(cube.band_count(), 3);
            assert_eq!(cube.sample(2, 1, 0), 10.0);
        }

        #[test]
        fn test_missing_dataset() {
            let tmp = NamedTempFile::new().unwrap();
            write_cube(tmp.path(), &["other"], &[1, 1, 1], &[0.0]);

            let err = Hdf5CubeLoader::new().load(tmp.path()).unwrap_err();
            assert!(matches!(err, Error::DatasetNotFound(_)));
        }

        #[test]
        fn test_custom_dataset_path() {
            let tmp = NamedTempFile::new().unwrap();
            write_cube(tmp.path(), &["other"], &[1, 1, 2], &[4.0, 8.0]);

            let loader = Hdf5CubeLoader::new().with_dataset_paths(["other/inputdata"]);
            let cube = loader.load(tmp.path()).unwrap();
            assert_eq!(cube.width(), 2);
            assert_eq!(cube.max_value(), 8.0);
        }
    }
}
