//! Published-sheet feed fetched with a single HTTP(S) GET.
//!
//! Google Sheets "publish to web" CSV exports redirect once before serving
//! the body; `reqwest` follows redirects by default.

use crate::FeedError;

#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: String,
    client: reqwest::Client,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the body as UTF-8 text. Non-2xx responses are errors.
    pub async fn read(&self) -> Result<String, FeedError> {
        tracing::debug!(url = %self.url, "fetching feed");
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|source| self.transport(source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| self.transport(source))?;
        let text = String::from_utf8(bytes.to_vec()).map_err(|_| FeedError::Decode {
            url: self.url.clone(),
        })?;
        tracing::info!(url = %self.url, bytes = text.len(), "fetched feed");
        Ok(text)
    }

    fn transport(&self, source: reqwest::Error) -> FeedError {
        FeedError::Http {
            url: self.url.clone(),
            source,
        }
    }
}
