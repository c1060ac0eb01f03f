use crate::error::DecodeError;
use crate::utils::luminance;

/// Channel layout of a [`PixelBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 1 byte per pixel, luminance only
    Luma8,
    /// 3 bytes per pixel, RGB
    Rgb8,
    /// 4 bytes per pixel, RGBA (alpha ignored)
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel for this layout
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Luma8 => 1,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Raw pixel input for one decode pass.
///
/// The buffer is owned by the caller; the pipeline only reads it. Frames
/// from a video grabber and decoded upload images both arrive through this
/// type.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer, validating that `data` matches `width * height *
    /// bytes_per_pixel`.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        format: PixelFormat,
    ) -> Result<Self, DecodeError> {
        if width == 0 || height == 0 || data.len() != width * height * format.bytes_per_pixel() {
            return Err(DecodeError::InvalidBuffer);
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Greyscale buffer, 1 byte per pixel
    pub fn from_luma(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DecodeError> {
        Self::new(data, width, height, PixelFormat::Luma8)
    }

    /// RGB buffer, 3 bytes per pixel
    pub fn from_rgb(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DecodeError> {
        Self::new(data, width, height, PixelFormat::Rgb8)
    }

    /// RGBA buffer, 4 bytes per pixel (the video-frame layout)
    pub fn from_rgba(data: Vec<u8>, width: usize, height: usize) -> Result<Self, DecodeError> {
        Self::new(data, width, height, PixelFormat::Rgba8)
    }

    /// Buffer width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Channel layout
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw sample bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Per-pixel luminance, converting from RGB/RGBA when needed
    pub(crate) fn to_luma(&self) -> Vec<u8> {
        match self.format {
            PixelFormat::Luma8 => self.data.clone(),
            PixelFormat::Rgb8 => luminance::rgb_to_luma(&self.data, self.width, self.height, 3),
            PixelFormat::Rgba8 => luminance::rgb_to_luma(&self.data, self.width, self.height, 4),
        }
    }
}
