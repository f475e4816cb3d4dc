use std::path::Path;

use common::error::ConvertError;
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

pub trait IHeifDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ConvertError>;
}

/// Decodes the primary image of a HEIC/HEIF container through libheif.
/// Images with an alpha channel come back as RGBA, everything else as RGB.
pub struct LibHeifDecoder;

impl IHeifDecoder for LibHeifDecoder {
    fn decode(&self, path: &Path) -> Result<DynamicImage, ConvertError> {
        let path = path.to_str().ok_or_else(|| ConvertError::Conversion("temp path is not valid UTF-8".to_string()))?;
        let lib_heif = LibHeif::new();
        let context = HeifContext::read_from_file(path).map_err(ConvertError::conversion)?;
        let handle = context.primary_image_handle().map_err(ConvertError::conversion)?;

        let has_alpha = handle.has_alpha_channel();
        let chroma = if has_alpha { RgbChroma::Rgba } else { RgbChroma::Rgb };
        let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(chroma), None).map_err(ConvertError::conversion)?;

        let planes = decoded.planes();
        let interleaved = planes
            .interleaved
            .ok_or_else(|| ConvertError::Conversion("decoded image has no interleaved plane".to_string()))?;
        let width = interleaved.width;
        let height = interleaved.height;
        let channels = if has_alpha { 4 } else { 3 };
        let row_len = width as usize * channels;

        // rows are padded up to `stride`
        let mut pixels = Vec::with_capacity(row_len * height as usize);
        for row in interleaved.data.chunks(interleaved.stride).take(height as usize) {
            pixels.extend_from_slice(&row[..row_len]);
        }

        let image = if has_alpha {
            RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
        } else {
            RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
        };
        image.ok_or_else(|| ConvertError::Conversion("decoded pixel buffer is too small".to_string()))
    }
}
