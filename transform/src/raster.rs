use std::{io::Cursor, path::Path};

use common::{error::ConvertError, models::OutputFormat};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

pub fn has_alpha(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

/// Composites `image` over an opaque white canvas of the same size, discarding alpha.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    let source = image.to_rgba8();
    let mut flattened = RgbImage::from_pixel(source.width(), source.height(), WHITE);
    for (target, pixel) in flattened.pixels_mut().zip(source.pixels()) {
        let [r, g, b, a] = pixel.0;
        *target = Rgb([blend(r, a), blend(g, a), blend(b, a)]);
    }
    flattened
}

fn blend(channel: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
}

/// Brings a decoded image into a color mode the target encoder accepts.
/// JPEG and PDF get an opaque RGB raster, PNG keeps whatever was decoded.
pub fn prepare(image: DynamicImage, format: OutputFormat) -> DynamicImage {
    match format {
        OutputFormat::Png => image,
        OutputFormat::Jpeg | OutputFormat::Pdf if has_alpha(&image) => DynamicImage::ImageRgb8(flatten_onto_white(&image)),
        OutputFormat::Jpeg | OutputFormat::Pdf => match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
    }
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, ConvertError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).map_err(ConvertError::conversion)?;
    Ok(buffer.into_inner())
}

/// Intermediate raster for PDF assembly, always PNG.
pub fn write_raster(image: &DynamicImage, path: &Path) -> Result<(), ConvertError> {
    image.save_with_format(path, ImageFormat::Png).map_err(ConvertError::conversion)
}
