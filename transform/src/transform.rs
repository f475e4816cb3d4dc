use std::path::Path;

use ::common::error::ConvertError;
use pdfium_render::prelude::*;

pub fn init_pdfium(library_path: &str) -> Result<Pdfium, &'static str> {
    Ok(Pdfium::new(Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(library_path)).map_err(|_| "Could not init pdfium")?))
}

/// Wraps a lossless raster file into a single page PDF.
pub trait IPdfWrapper: Send + Sync {
    fn wrap(&self, raster: &Path) -> Result<Vec<u8>, ConvertError>;
}

pub struct PdfiumPdfWrapper {
    pub pdfium: Pdfium,
}

impl IPdfWrapper for PdfiumPdfWrapper {
    fn wrap(&self, raster: &Path) -> Result<Vec<u8>, ConvertError> {
        let source_img = image::open(raster).map_err(ConvertError::conversion)?;
        let width = PdfPoints::new(source_img.width() as f32);
        let height = PdfPoints::new(source_img.height() as f32);

        let mut new_document = self.pdfium.create_new_pdf().map_err(pdfium_error)?;
        {
            let object = PdfPageImageObject::new_with_width(&new_document, &source_img, width).map_err(pdfium_error)?;
            let mut page = new_document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::Custom(width, height))
                .map_err(pdfium_error)?;
            page.objects_mut().add_image_object(object).map_err(pdfium_error)?;
        }
        new_document.save_to_bytes().map_err(pdfium_error)
    }
}

fn pdfium_error(err: PdfiumError) -> ConvertError {
    ConvertError::Conversion(format!("pdfium: {:?}", err))
}
