//! hyspec-cli: Command-line interface for hyspec.
//!
//! Opens an HDF5 hyperspectral cube and renders, filters, highlights or
//! profiles it without a display.
#![allow(clippy::uninlined_format_args, clippy::too_many_lines)]

use clap::{Parser, Subcommand, ValueEnum};

use hyspec_algorithms::{
    extract_profile, highlight, render_filtered, FilterConfig, GrayscaleRenderer,
    HighlightCondition, SpatialFilter,
};
use hyspec_core::{Cube, PixelCoord, Rect, SelectionRegion};
use hyspec_io::{write_profile_csv, write_raster_png, CubeLoader, Hdf5CubeLoader};
use hyspec_viewer::{PipelineMessage, RenderPipeline, ViewerConfig, ViewerError};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    HyspecIo(#[from] hyspec_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] hyspec_core::Error),

    #[error("Viewer error: {0}")]
    Viewer(#[from] ViewerError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Spatial filter selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterKind {
    /// Non-overlapping block averages
    Mosaic,
    /// Sliding window anchored at each pixel
    Box,
}

impl From<FilterKind> for SpatialFilter {
    fn from(kind: FilterKind) -> Self {
        match kind {
            FilterKind::Mosaic => SpatialFilter::Mosaic,
            FilterKind::Box => SpatialFilter::Box,
        }
    }
}

/// Highlight side selection.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Condition {
    /// Flag samples greater than the threshold
    Above,
    /// Flag samples less than the threshold
    Below,
}

impl From<Condition> for HighlightCondition {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Above => HighlightCondition::Above,
            Condition::Below => HighlightCondition::Below,
        }
    }
}

/// Hyperspectral cube browser and exporter.
#[derive(Parser)]
#[command(name = "hyspec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// HDF5 dataset path to probe (repeatable, replaces the configured list)
    #[arg(long = "dataset", global = true)]
    datasets: Vec<String>,

    /// Wavelength of band 1 in nm
    #[arg(long, global = true)]
    base_nm: Option<f64>,

    /// Band spacing in nm
    #[arg(long, global = true)]
    increment_nm: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show dimensions, value range and wavelength range of a cube
    Info {
        /// Input HDF5 file
        input: PathBuf,
    },

    /// Render every band to PNG
    Render {
        /// Input HDF5 file
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// File name prefix
        #[arg(long, default_value = "band")]
        prefix: String,
    },

    /// Extract the spectral profile of a pixel or region
    Profile {
        /// Input HDF5 file
        input: PathBuf,

        /// Pixel row (region corner when --to-row is given)
        #[arg(long)]
        row: usize,

        /// Pixel column (region corner when --to-col is given)
        #[arg(long)]
        col: usize,

        /// Opposite region corner row
        #[arg(long, requires = "to_col")]
        to_row: Option<usize>,

        /// Opposite region corner column
        #[arg(long, requires = "to_row")]
        to_col: Option<usize>,

        /// CSV output file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a spatial filter to one band and write a PNG
    Filter {
        /// Input HDF5 file
        input: PathBuf,

        /// Band number, counted from 1
        #[arg(short, long, default_value = "1")]
        band: usize,

        /// Filter to apply
        #[arg(short, long, value_enum, default_value = "mosaic")]
        filter: FilterKind,

        /// Window size in pixels (overrides the configuration)
        #[arg(short = 'k', long)]
        block_size: Option<usize>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Flag samples above or below a threshold and write a PNG
    Highlight {
        /// Input HDF5 file
        input: PathBuf,

        /// Band number, counted from 1
        #[arg(short, long, default_value = "1")]
        band: usize,

        /// Raw sample threshold
        #[arg(short, long)]
        threshold: f32,

        /// Side of the threshold to flag
        #[arg(long, value_enum, default_value = "above")]
        condition: Condition,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Info { input } => {
            let cube = load_cube(&input, &config)?;
            let (first, last) = config.wavelengths.range(cube.band_count());
            println!("File:        {}", input.display());
            println!("Bands:       {}", cube.band_count());
            println!("Size:        {} x {} (width x height)", cube.width(), cube.height());
            println!("Value range: {} .. {}", cube.min_value(), cube.max_value());
            println!("Wavelengths: {} nm .. {} nm", first, last);
        }

        Commands::Render {
            input,
            output,
            prefix,
        } => {
            let cube = Arc::new(load_cube(&input, &config)?);
            std::fs::create_dir_all(&output)?;

            let start = Instant::now();
            let mut pipeline =
                RenderPipeline::new(Arc::new(GrayscaleRenderer::new(config.wavelengths)));
            pipeline.start(Arc::clone(&cube))?;

            let bands = loop {
                match pipeline.next_blocking() {
                    Some(PipelineMessage::Progress(percent)) => {
                        info!("rendering bands... {}%", percent);
                    }
                    Some(PipelineMessage::Complete(bands, elapsed)) => {
                        info!("rendered {} bands in {:.2?}", bands.len(), elapsed);
                        break bands;
                    }
                    Some(PipelineMessage::Failed(reason)) => {
                        return Err(ViewerError::RenderFailed(reason).into());
                    }
                    None => {
                        return Err(
                            ViewerError::RenderFailed("render run ended early".into()).into()
                        );
                    }
                }
            };

            for band in &bands {
                let name = format!(
                    "{}_{:03}_{}nm.png",
                    prefix,
                    band.band_index() + 1,
                    band.wavelength_nm()
                );
                write_raster_png(output.join(name), band.buffer())?;
            }
            println!(
                "Wrote {} PNG files to {} in {:.2?}",
                bands.len(),
                output.display(),
                start.elapsed()
            );
        }

        Commands::Profile {
            input,
            row,
            col,
            to_row,
            to_col,
            output,
        } => {
            let cube = load_cube(&input, &config)?;
            let at = PixelCoord::new(row, col);
            let selection = match (to_row, to_col) {
                (Some(r), Some(c)) => {
                    SelectionRegion::Region(Rect::from_corners(at, PixelCoord::new(r, c)))
                }
                _ => SelectionRegion::Point(at),
            };
            let profile = extract_profile(&cube, &selection, &config.wavelengths)?;

            if let Some(path) = output {
                write_profile_csv(&path, &profile)?;
                println!("Wrote {} bands to {}", profile.len(), path.display());
            } else {
                println!("{}", profile.title());
                println!("wavelength\t{}", profile.value_label());
                for (wavelength, value) in profile.points() {
                    println!("{}\t{}", wavelength, value);
                }
            }
        }

        Commands::Filter {
            input,
            band,
            filter,
            block_size,
            output,
        } => {
            let cube = load_cube(&input, &config)?;
            let band = band_index(band, &cube)?;
            let filter_config = block_size.map_or(config.filter, |k| {
                FilterConfig::new().with_block_size(k)
            });
            let rendered = render_filtered(
                &cube,
                band,
                filter.into(),
                &filter_config,
                &config.wavelengths,
            )?;
            write_raster_png(&output, rendered.buffer())?;
            println!(
                "Wrote {} filter (k={}) of band {} ({}) to {}",
                SpatialFilter::from(filter),
                filter_config.effective_block_size(),
                band + 1,
                rendered.wavelength_label(),
                output.display()
            );
        }

        Commands::Highlight {
            input,
            band,
            threshold,
            condition,
            output,
        } => {
            let cube = load_cube(&input, &config)?;
            let band = band_index(band, &cube)?;
            let rendered = highlight(
                &cube,
                band,
                threshold,
                condition.into(),
                &config.wavelengths,
            )?;
            write_raster_png(&output, rendered.buffer())?;
            println!(
                "Wrote band {} ({}) with samples {} {} flagged to {}",
                band + 1,
                rendered.wavelength_label(),
                HighlightCondition::from(condition),
                threshold,
                output.display()
            );
        }
    }

    Ok(())
}

/// Configuration file overlaid with command-line overrides.
fn load_config(cli: &Cli) -> Result<ViewerConfig> {
    let mut config = match &cli.config {
        Some(path) => ViewerConfig::from_file(path)?,
        None => ViewerConfig::default(),
    };
    if !cli.datasets.is_empty() {
        config.dataset_paths.clone_from(&cli.datasets);
    }
    if let Some(base) = cli.base_nm {
        config.wavelengths.base_nm = base;
    }
    if let Some(increment) = cli.increment_nm {
        config.wavelengths.increment_nm = increment;
    }
    Ok(config)
}

fn load_cube(path: &Path, config: &ViewerConfig) -> Result<Cube> {
    let loader = Hdf5CubeLoader::new().with_dataset_paths(config.dataset_paths.clone());
    Ok(loader.load(path)?)
}

/// Convert a 1-based band number to an index.
fn band_index(band: usize, cube: &Cube) -> Result<usize> {
    if band == 0 || band > cube.band_count() {
        return Err(CliError::InvalidArgument(format!(
            "band must be between 1 and {}, got {}",
            cube.band_count(),
            band
        )));
    }
    Ok(band - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_index_bounds() {
        let cube = Cube::from_bands(1, 1, &[vec![0.0], vec![1.0]]).unwrap();
        assert_eq!(band_index(1, &cube).unwrap(), 0);
        assert_eq!(band_index(2, &cube).unwrap(), 1);
        assert!(band_index(0, &cube).is_err());
        assert!(band_index(3, &cube).is_err());
    }

    #[test]
    fn test_overrides_apply_to_defaults() {
        let cli = Cli::try_parse_from([
            "hyspec",
            "info",
            "cube.h5",
            "--dataset",
            "data/cube",
            "--base-nm",
            "400",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.dataset_paths, vec!["data/cube".to_string()]);
        assert_eq!(config.wavelengths.base_nm, 400.0);
        assert_eq!(config.wavelengths.increment_nm, 4.0);
        assert_eq!(config.filter.block_size, 10);
    }

    #[test]
    fn test_region_requires_both_corners() {
        let parsed = Cli::try_parse_from([
            "hyspec", "profile", "cube.h5", "--row", "1", "--col", "2", "--to-row", "3",
        ]);
        assert!(parsed.is_err());
    }
}
