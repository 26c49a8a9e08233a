/// Image decoding into the GPU upload layout.
///
/// Every decoded image comes out as tightly packed RGBA8: row-major,
/// top-to-bottom, 4 bytes per pixel in R, G, B, A order. Sources without an
/// alpha channel get an opaque (`0xFF`) alpha byte on every pixel.

use std::fs;
use std::path::Path;
use image::{DynamicImage, ImageFormat, ImageReader};
use crate::error::{Error, Result};
use crate::engine_warn;

// ===== DATA TYPES =====

/// A decoded image ready for `upload_image_2d`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixels, `width * height * 4` bytes
    pub pixels: Vec<u8>,
    /// Whether the source carried an alpha channel
    pub has_alpha: bool,
}

// ===== TRAIT =====

/// Turns an image file into RGBA8 pixels
///
/// The texture cache owns one decoder; tests swap in their own to count
/// decodes or avoid touching the filesystem.
pub trait PixelDecoder: Send + Sync {
    /// Decode the image at `path`
    ///
    /// # Errors
    ///
    /// `Error::DecodeError` if the file is missing, unreadable, empty, or not
    /// a supported raster image.
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}

// ===== IMAGE FILE DECODER =====

/// Decoder backed by the `image` crate
///
/// The real format is sniffed from the file content. The extension is only
/// a hint: a mismatch is logged, never fatal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileDecoder;

impl ImageFileDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode an encoded image held in memory (format sniffed from content)
    pub fn decode_memory(&self, bytes: &[u8]) -> Result<DecodedImage> {
        if bytes.is_empty() {
            return Err(Error::DecodeError("image data is empty".to_string()));
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::DecodeError(format!("<memory>: {}", e)))?;
        Self::to_rgba8(image, "<memory>")
    }

    fn to_rgba8(image: DynamicImage, origin: &str) -> Result<DecodedImage> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(Error::DecodeError(format!(
                "{}: image has no pixels ({}x{})", origin, width, height
            )));
        }

        let has_alpha = image.color().has_alpha();
        let pixels = image.into_rgba8().into_raw();
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);

        Ok(DecodedImage {
            width,
            height,
            pixels,
            has_alpha,
        })
    }
}

impl PixelDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let origin = path.display().to_string();
        let decode_error = |reason: String| Error::DecodeError(format!("{}: {}", origin, reason));

        let metadata = fs::metadata(path).map_err(|e| decode_error(e.to_string()))?;
        if !metadata.is_file() {
            return Err(decode_error("not a regular file".to_string()));
        }
        if metadata.len() == 0 {
            return Err(decode_error("file is empty".to_string()));
        }

        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| decode_error(e.to_string()))?;

        let hinted = ImageFormat::from_path(path).ok();
        if let (Some(hinted), Some(sniffed)) = (hinted, reader.format()) {
            if hinted != sniffed {
                engine_warn!("lumen::PixelDecoder",
                    "'{}' is really {:?} (extension says {:?})", origin, sniffed, hinted);
            }
        }

        let image = reader.decode().map_err(|e| decode_error(e.to_string()))?;
        Self::to_rgba8(image, &origin)
    }
}

#[cfg(test)]
#[path = "pixel_decoder_tests.rs"]
mod tests;
