//! Pixel access for the color classifier.
//!
//! Images are decoded once into a flat RGB buffer with channels normalized
//! to 0.0-1.0; the classifier only needs random access to single pixels.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Normalized RGB color, each channel in [0, 1].
pub type Rgb = [f32; 3];

/// Errors from the color classifier's image access.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Source or mask image failed to decode; the filter pass is skipped
    /// and the caller's labels are left untouched.
    #[error("failed to decode image {path:?}: {source}")]
    ImageDecode {
        /// Path of the image that failed.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: image::ImageError,
    },
}

/// Random access to decoded pixels.
pub trait PixelSource {
    /// Image width in pixels.
    fn width(&self) -> u32;

    /// Image height in pixels.
    fn height(&self) -> u32;

    /// Color at (x, y), or None when out of bounds.
    fn pixel(&self, x: i64, y: i64) -> Option<Rgb>;
}

/// Decoded RGB pixel buffer.
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// Row-major, 3 floats per pixel.
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Decode an image file into a normalized RGB buffer.
    pub fn open(path: &Path) -> Result<Self, FilterError> {
        let img = image::open(path)
            .map_err(|source| FilterError::ImageDecode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let width = img.width();
        let height = img.height();
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for pixel in img.pixels() {
            data.push(f32::from(pixel[0]) / 255.0);
            data.push(f32::from(pixel[1]) / 255.0);
            data.push(f32::from(pixel[2]) / 255.0);
        }

        log::trace!("Decoded {:?}: {}x{} RGB", path, width, height);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from raw normalized pixels (row-major RGB triples).
    ///
    /// Panics if the data length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Build a uniform single-color buffer.
    pub fn uniform(width: u32, height: u32, color: Rgb) -> Self {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl PixelSource for PixelBuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: i64, y: i64) -> Option<Rgb> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }
}
