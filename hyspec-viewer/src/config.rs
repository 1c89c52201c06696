//! Viewer configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hyspec_algorithms::{FilterConfig, HighlightConfig};
use hyspec_core::WavelengthAxis;
use hyspec_io::DEFAULT_DATASET_PATHS;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings shared by the session and the command-line tool.
///
/// Every field is optional in JSON; missing fields take their defaults.
///
/// ```json
/// {
///   "wavelengths": { "base_nm": 528.0, "increment_nm": 4.0 },
///   "filter": { "block_size": 10 },
///   "highlight": { "threshold": 1200.0, "condition": "above" },
///   "dataset_paths": ["inputdata"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Band index to wavelength mapping.
    pub wavelengths: WavelengthAxis,
    /// Spatial filter settings.
    pub filter: FilterConfig,
    /// Default threshold highlight settings.
    pub highlight: HighlightConfig,
    /// HDF5 dataset paths probed when opening a file.
    pub dataset_paths: Vec<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            wavelengths: WavelengthAxis::default(),
            filter: FilterConfig::default(),
            highlight: HighlightConfig::default(),
            dataset_paths: DEFAULT_DATASET_PATHS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl ViewerConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load configuration from a JSON string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid JSON for this schema.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the wavelength axis.
    #[must_use]
    pub fn with_wavelengths(mut self, wavelengths: WavelengthAxis) -> Self {
        self.wavelengths = wavelengths;
        self
    }

    /// Sets the filter configuration.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the default highlight configuration.
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    /// Sets the probed HDF5 dataset paths.
    #[must_use]
    pub fn with_dataset_paths(mut self, paths: Vec<String>) -> Self {
        self.dataset_paths = paths;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyspec_algorithms::HighlightCondition;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.wavelengths.base_nm, 528.0);
        assert_eq!(config.filter.block_size, 10);
        assert_eq!(config.dataset_paths.len(), 3);
        assert_eq!(config.dataset_paths[1], "inputdata");
    }

    #[test]
    fn test_partial_json() {
        let config = ViewerConfig::from_json(
            r#"{ "wavelengths": { "increment_nm": 2.0 }, "highlight": { "threshold": 5.0, "condition": "below" } }"#,
        )
        .unwrap();
        assert_eq!(config.wavelengths.base_nm, 528.0);
        assert_eq!(config.wavelengths.increment_nm, 2.0);
        assert_eq!(config.highlight.condition, HighlightCondition::Below);
        assert_eq!(config.filter.block_size, 10);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "filter": {{ "block_size": 4 }}, "dataset_paths": ["a/b"] }}"#).unwrap();
        let config = ViewerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.filter.block_size, 4);
        assert_eq!(config.dataset_paths, vec!["a/b".to_string()]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(ViewerConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let config = ViewerConfig::new()
            .with_filter(FilterConfig::new().with_block_size(3))
            .with_dataset_paths(vec!["x".to_string()]);
        let parsed = ViewerConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
