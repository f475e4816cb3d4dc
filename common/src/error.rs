use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Invalid output format. Supported formats: jpeg, jpg, png, pdf")]
    InvalidFormat,

    #[error("File must be in HEIC or HEIF format")]
    InvalidFileType,

    #[error("No files provided")]
    NoFiles,

    #[error("No valid HEIC files found")]
    NoValidFiles,

    #[error("{0}")]
    Conversion(String),
}

impl ConvertError {
    pub fn conversion(err: impl Display) -> Self {
        ConvertError::Conversion(err.to_string())
    }

    /// Validation failures are the caller's fault; only decode/encode failures are internal.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ConvertError::Conversion(_))
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::conversion(err)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Post not found")]
    NotFound,

    #[error("Post with this ID already exists")]
    Conflict,

    #[error("Post must have a string id")]
    InvalidDocument,
}
