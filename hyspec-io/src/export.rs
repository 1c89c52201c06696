//! Raster and profile exporters.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hyspec_core::{RasterBuffer, SpectralProfile};
use image::{ImageFormat, RgbImage};
use log::debug;

use crate::{Error, Result};

/// Writes a raster as an 8-bit RGB PNG.
///
/// # Errors
/// Returns an error if the raster dimensions do not fit a PNG or encoding fails.
pub fn write_raster_png<P: AsRef<Path>>(path: P, raster: &RasterBuffer) -> Result<()> {
    let width = u32::try_from(raster.width())
        .map_err(|_| Error::InvalidFormat("raster width exceeds u32 range".to_string()))?;
    let height = u32::try_from(raster.height())
        .map_err(|_| Error::InvalidFormat("raster height exceeds u32 range".to_string()))?;

    let image = RgbImage::from_raw(width, height, raster.as_bytes().to_vec()).ok_or_else(|| {
        Error::InvalidFormat(format!("pixel buffer does not match {width}x{height}"))
    })?;
    image.save_with_format(path.as_ref(), ImageFormat::Png)?;
    debug!("wrote {width}x{height} PNG to {}", path.as_ref().display());
    Ok(())
}

/// Writer for spectral profile tables.
///
/// Output has a header row `wavelength,<value label>` followed by one row per
/// band.
pub struct ProfileCsvWriter<W: Write> {
    writer: W,
}

impl ProfileCsvWriter<BufWriter<File>> {
    /// Creates a writer for a new file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> ProfileCsvWriter<W> {
    /// Wraps an existing sink.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a profile as CSV.
    ///
    /// # Errors
    /// Returns an error on write failure.
    pub fn write_profile(&mut self, profile: &SpectralProfile) -> Result<()> {
        writeln!(
            self.writer,
            "wavelength,{}",
            csv_field(&profile.value_label())
        )?;

        for (wavelength, value) in profile.points() {
            writeln!(self.writer, "{wavelength},{value}")?;
        }

        self.writer.flush()?;
        Ok(())
    }

    /// Consumes the writer, returning the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Writes a profile to a CSV file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_profile_csv<P: AsRef<Path>>(path: P, profile: &SpectralProfile) -> Result<()> {
    ProfileCsvWriter::create(path)?.write_profile(profile)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
