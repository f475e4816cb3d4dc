use std::{
    io,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::util::random::generate_30_alphanumeric;

/// Scratch directory owned by a single request. Every file handed out by
/// [`TempRequestFileProvider::get_path`] lives inside it. The directory is removed
/// when the provider is dropped, so a cancelled request cleans up as well.
/// Blocking work that touches these files holds the provider through an `Arc`.
#[derive(Debug)]
pub struct TempRequestFileProvider {
    request_directory: PathBuf,
}

impl TempRequestFileProvider {
    /// Creates the directory before returning, so no cancellation point exists
    /// between creating it and owning it.
    pub fn build(root: &Path) -> io::Result<TempRequestFileProvider> {
        let dir = root.join(generate_30_alphanumeric());
        std::fs::create_dir_all(&dir)?;
        Ok(TempRequestFileProvider { request_directory: dir })
    }

    pub fn directory(&self) -> &Path {
        &self.request_directory
    }

    pub fn get_path(&self, extension: &str) -> PathBuf {
        self.request_directory.join(generate_30_alphanumeric()).with_extension(extension)
    }

    pub fn remove(&self, path: &Path) {
        if let Err(err) = std::fs::remove_file(path) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("Error occured, while deleting temp file {}: {}", path.display(), &err)
            }
        }
    }
}

impl Drop for TempRequestFileProvider {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(&self.request_directory) {
            if err.kind() != io::ErrorKind::NotFound {
                warn!("Error occured, while deleting temp request files for {}: {}", self.request_directory.display(), &err)
            }
        }
    }
}
