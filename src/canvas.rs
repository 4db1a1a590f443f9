//! Decoded RGBA images and canvas normalization.
//!
//! [`RawImage`] is the value type the diff pipeline works on: a decoded,
//! row-major RGBA buffer. Normalization reconciles two images of different
//! pixel dimensions onto a shared canvas by padding — content is placed at
//! the top-left origin and the extension area is filled with transparent
//! black. Padding never stretches; there is no scaling mode.

use image::{ImageBuffer, RgbaImage};
use std::io::Cursor;

/// Bytes per RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Error types for image decode/encode and buffer construction
#[derive(Debug)]
pub enum CanvasError {
    /// PNG bytes could not be decoded
    Decode(String),

    /// Image could not be encoded back to PNG
    Encode(String),

    /// Raw buffer length does not match the stated dimensions
    SizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for CanvasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanvasError::Decode(msg) => write!(f, "Image decode error: {}", msg),
            CanvasError::Encode(msg) => write!(f, "Image encode error: {}", msg),
            CanvasError::SizeMismatch { expected, actual } => write!(
                f,
                "Buffer size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for CanvasError {}

/// A decoded RGBA image (row-major, stride = width * 4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RawImage {
    /// Decode PNG bytes into an RGBA buffer
    pub fn from_png_bytes(data: &[u8]) -> CanvasResult<Self> {
        let img = image::load_from_memory(data).map_err(|e| CanvasError::Decode(e.to_string()))?;
        let rgba = img.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// Build an image from a raw RGBA buffer
    pub fn from_raw_rgba(width: u32, height: u32, pixels: Vec<u8>) -> CanvasResult<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(CanvasError::SizeMismatch {
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

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA buffer
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA value at (x, y); transparent black outside the image bounds
    pub fn pixel_at(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Encode the image as PNG bytes
    pub fn to_png(&self) -> CanvasResult<Vec<u8>> {
        let img: RgbaImage =
            ImageBuffer::from_raw(self.width, self.height, self.pixels.clone()).ok_or_else(
                || CanvasError::Encode("buffer does not match dimensions".to_string()),
            )?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .map_err(|e| CanvasError::Encode(e.to_string()))?;
        Ok(bytes)
    }

    /// Reconcile two images onto a shared canvas.
    ///
    /// Equal dimensions are returned unchanged. Otherwise both are padded to
    /// `(max(wA, wB), max(hA, hB))`: content stays at the top-left origin and
    /// the extension area is transparent black, which the comparison
    /// primitive treats as equal to any other transparent pixel.
    pub fn normalize_pair(a: RawImage, b: RawImage) -> (RawImage, RawImage) {
        if a.width == b.width && a.height == b.height {
            return (a, b);
        }
        let width = a.width.max(b.width);
        let height = a.height.max(b.height);
        (a.pad_to(width, height), b.pad_to(width, height))
    }

    /// Place this image at the origin of a larger transparent canvas
    fn pad_to(self, width: u32, height: u32) -> RawImage {
        if self.width == width && self.height == height {
            return self;
        }
        let src_stride = self.width as usize * BYTES_PER_PIXEL;
        let dst_stride = width as usize * BYTES_PER_PIXEL;
        let mut pixels = vec![0u8; dst_stride * height as usize];
        for y in 0..self.height as usize {
            let src = y * src_stride;
            let dst = y * dst_stride;
            pixels[dst..dst + src_stride].copy_from_slice(&self.pixels[src..src + src_stride]);
        }
        RawImage {
            width,
            height,
            pixels,
        }
    }
}
