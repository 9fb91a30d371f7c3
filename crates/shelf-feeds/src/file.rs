//! Local CSV file feed.

use crate::FeedError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file as UTF-8. A missing file is reported as
    /// [`FeedError::NotFound`] rather than a generic I/O error.
    pub async fn read(&self) -> Result<String, FeedError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => {
                tracing::info!(path = %self.path.display(), bytes = text.len(), "loaded feed file");
                Ok(text)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(FeedError::NotFound(self.path.clone()))
            }
            Err(source) => Err(FeedError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
