//! shelf-feeds — product feed source adapters for shelf.
//!
//! Each adapter reads the whole feed as UTF-8 text in one shot. There is no
//! retry and no timeout: a run performs at most one read or one request.

pub mod file;
pub mod http;

use shelf_core::config::{SourceConfig, SourceKind};
use std::path::PathBuf;

pub use file::FileFeed;
pub use http::HttpFeed;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed file {0} not found")]
    NotFound(PathBuf),
    #[error("failed to read feed file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("feed from {url} is not valid UTF-8")]
    Decode { url: String },
}

impl FeedError {
    /// Network-side failures are answered with an empty, error-annotated
    /// catalog; local file failures abort the run.
    pub fn allows_fallback(&self) -> bool {
        matches!(
            self,
            FeedError::Http { .. } | FeedError::Status { .. } | FeedError::Decode { .. }
        )
    }
}

/// A configured feed source.
#[derive(Debug, Clone)]
pub enum Feed {
    File(FileFeed),
    Http(HttpFeed),
}

impl Feed {
    /// Build the feed described by a `[source]` config section.
    pub fn from_config(source: &SourceConfig) -> Self {
        match source.kind {
            SourceKind::File => Feed::File(FileFeed::new(&source.path)),
            SourceKind::Http => Feed::Http(HttpFeed::new(&source.url)),
        }
    }

    /// Read the whole feed as text.
    pub async fn read(&self) -> Result<String, FeedError> {
        match self {
            Feed::File(feed) => feed.read().await,
            Feed::Http(feed) => feed.read().await,
        }
    }

    /// Path or URL, for logs and catalog metadata.
    pub fn describe(&self) -> String {
        match self {
            Feed::File(feed) => feed.path().display().to_string(),
            Feed::Http(feed) => feed.url().to_string(),
        }
    }
}

impl std::fmt::Display for Feed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Feed::File(_) => write!(f, "file"),
            Feed::Http(_) => write!(f, "http"),
        }
    }
}
