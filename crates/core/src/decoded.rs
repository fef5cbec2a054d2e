//! Decoded RGBA8 images ready for texture upload.

use crate::error::RenderError;

/// A tightly packed RGBA8 image.
///
/// Invariant: `pixels.len() == width * height * 4`, and both dimensions
/// are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps raw RGBA8 pixels.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::InvalidDimensions`] for a zero dimension and
    /// [`RenderError::PixelDataMismatch`] if the buffer length is wrong.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions);
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(RenderError::PixelDataMismatch {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A single opaque white pixel.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        }
    }

    /// Decodes PNG or JPEG bytes into RGBA8.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ImageDecode`] if the format is unsupported or
    /// the data is corrupt.
    #[cfg(feature = "decode")]
    pub fn from_encoded(bytes: &[u8]) -> Result<Self, RenderError> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| RenderError::ImageDecode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {width}x{height} image");
        Self::new(width, height, rgba.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
