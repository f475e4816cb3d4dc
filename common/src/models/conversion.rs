use std::{fmt, path::Path, str::FromStr};

use bytes::Bytes;
use mime::Mime;

use crate::{error::ConvertError, util::mime::get_content_type};

pub const BATCH_ARCHIVE_NAME: &str = "converted_files.zip";

const HEIF_EXTENSIONS: [&str; 2] = [".heic", ".heif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub const SUPPORTED: [&'static str; 4] = ["jpeg", "jpg", "png", "pdf"];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> Mime {
        match self {
            OutputFormat::Jpeg => mime::IMAGE_JPEG,
            OutputFormat::Png => mime::IMAGE_PNG,
            OutputFormat::Pdf => mime::APPLICATION_PDF,
        }
    }

    /// Name of the converted file: the upload's stem with this format's extension.
    pub fn output_filename(&self, filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("converted");
        format!("{}.{}", stem, self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ConvertError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ConvertError::InvalidFormat),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

pub fn is_heif_filename(filename: &str) -> bool {
    let filename = filename.to_lowercase();
    HEIF_EXTENSIONS.iter().any(|extension| filename.ends_with(extension))
}

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedImage {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        UploadedImage {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertedArtifact {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: Mime,
}

impl ConvertedArtifact {
    pub fn new(filename: String, content: Vec<u8>) -> Self {
        let content_type = get_content_type(&filename);
        ConvertedArtifact {
            filename,
            content,
            content_type,
        }
    }
}
