use std::path::Path;

use mime::Mime;

pub fn get_content_type(filename: &str) -> Mime {
    if let Some(extension) = Path::new(filename).extension() {
        if let Some(extension) = extension.to_str() {
            return match extension.to_lowercase().as_str() {
                "pdf" => mime::APPLICATION_PDF,
                "png" => mime::IMAGE_PNG,
                "jpg" => mime::IMAGE_JPEG,
                "jpeg" => mime::IMAGE_JPEG,
                "zip" => "application/zip".parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
                _ => mime::APPLICATION_OCTET_STREAM,
            };
        }
    }
    mime::APPLICATION_OCTET_STREAM
}
