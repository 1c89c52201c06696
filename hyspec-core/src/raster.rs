//! 8-bit RGB rasters produced for display.

use crate::error::{Error, Result};

/// Bytes per pixel in a [`RasterBuffer`].
pub const CHANNELS: usize = 3;

/// Owned, contiguous RGB8 pixel buffer.
///
/// Pixels are stored row-major: the pixel at `(row, col)` occupies
/// `pixels[(row * width + col) * 3 ..][..3]`. All writes go through
/// bounds-checked accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Create a black buffer.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * CHANNELS],
        }
    }

    /// Wrap existing RGB8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] if `pixels.len() != width * height * 3`.
    pub fn from_raw(width: usize, height: usize, pixels: Vec<u8>) -> Result<Self> {
        let expected = width * height * CHANNELS;
        if pixels.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Byte offset of the first channel of `(row, col)`, or `None` if out of bounds.
    #[must_use]
    #[inline]
    pub fn offset(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| (row * self.width + col) * CHANNELS)
    }

    /// Write a single channel of one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if the pixel is outside the
    /// buffer or `channel >= 3`.
    pub fn set_pixel(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Result<()> {
        match self.offset(row, col) {
            Some(offset) if channel < CHANNELS => {
                self.pixels[offset + channel] = value;
                Ok(())
            }
            _ => Err(Error::InvalidCoordinate { row, col }),
        }
    }

    /// Write all three channels of one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if the pixel is outside the buffer.
    pub fn set_rgb(&mut self, row: usize, col: usize, rgb: [u8; 3]) -> Result<()> {
        let offset = self
            .offset(row, col)
            .ok_or(Error::InvalidCoordinate { row, col })?;
        self.pixels[offset..offset + CHANNELS].copy_from_slice(&rgb);
        Ok(())
    }

    /// Read one pixel.
    #[must_use]
    pub fn rgb(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        let offset = self.offset(row, col)?;
        Some([
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
        ])
    }

    /// Mutable access to one row of pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] if `row` is outside the buffer.
    pub fn row_mut(&mut self, row: usize) -> Result<&mut [u8]> {
        if row >= self.height {
            return Err(Error::InvalidCoordinate { row, col: 0 });
        }
        let stride = self.width * CHANNELS;
        Ok(&mut self.pixels[row * stride..(row + 1) * stride])
    }

    /// Raw RGB8 bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the buffer and return the raw bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }
}

/// One displayable band image.
///
/// Immutable once produced; safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBand {
    band_index: usize,
    wavelength_nm: f64,
    buffer: RasterBuffer,
}

impl RenderedBand {
    /// Wrap a finished buffer.
    #[must_use]
    pub fn new(band_index: usize, wavelength_nm: f64, buffer: RasterBuffer) -> Self {
        Self {
            band_index,
            wavelength_nm,
            buffer,
        }
    }

    /// Index of the source band in the cube.
    #[must_use]
    pub fn band_index(&self) -> usize {
        self.band_index
    }

    /// Wavelength associated with the band in nanometres.
    #[must_use]
    pub fn wavelength_nm(&self) -> f64 {
        self.wavelength_nm
    }

    /// Human-readable wavelength, e.g. `"528 nm"`.
    #[must_use]
    pub fn wavelength_label(&self) -> String {
        format!("{} nm", self.wavelength_nm)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    /// RGB8 bytes, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Read one pixel.
    #[must_use]
    pub fn pixel(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        self.buffer.rgb(row, col)
    }

    /// Whether every pixel has equal R, G and B.
    #[must_use]
    pub fn is_grayscale(&self) -> bool {
        self.pixels()
            .chunks_exact(CHANNELS)
            .all(|p| p[0] == p[1] && p[1] == p[2])
    }

    /// Borrow the underlying buffer.
    #[must_use]
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }
}
