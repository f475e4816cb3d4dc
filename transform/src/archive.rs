use std::io::{Cursor, Write};

use common::{error::ConvertError, models::ConvertedArtifact};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// Packs the artifacts into an in-memory ZIP, one deflated entry each, in the given order.
pub fn build_archive(artifacts: &[ConvertedArtifact]) -> Result<Vec<u8>, ConvertError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for artifact in artifacts {
        writer.start_file(artifact.filename.as_str(), options).map_err(ConvertError::conversion)?;
        writer.write_all(&artifact.content)?;
    }
    let cursor = writer.finish().map_err(ConvertError::conversion)?;
    Ok(cursor.into_inner())
}
