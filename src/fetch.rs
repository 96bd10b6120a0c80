//! Page fetching.
//!
//! The delivery channel's probing methods need the target page's body. That
//! need is expressed as the [`PageSource`] trait so tests can serve fixture
//! pages; [`HttpSource`] is the production implementation on top of reqwest.
//!
//! Two fetch modes mirror the decreasing strictness of the probing methods:
//! [`FetchMode::Standard`] insists on a success status and an HTML-looking
//! body, [`FetchMode::Lenient`] takes whatever the server returns.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::ClientBuilder;
use thiserror::Error;

use crate::config::Config;

/// How strict a fetch is about what it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Success status required; body must look like an HTML document.
    Standard,
    /// Any status, any body.
    Lenient,
}

/// A fetched page: the final URL after redirects, and the raw body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL (after any redirects)
    pub url: String,
    /// Raw response body
    pub body: String,
}

/// Error types for page fetching.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("HTTP client build error: {0}")]
    ClientError(reqwest::Error),

    /// The request itself failed (connect, timeout, TLS, …).
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The server answered with a non-success status (standard mode only).
    #[error("Unexpected HTTP status: {0}")]
    StatusError(u16),

    /// The body does not look like an HTML document (standard mode only).
    #[error("Response body is not HTML")]
    NotHtml,
}

/// Something that can produce a page body for a URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the page at `url` under the given mode.
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchedPage, FetchError>;
}

/// HTTP page source backed by a shared reqwest client.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Builds a source from the analysis configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientError`] if the underlying client cannot be
    /// constructed.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::ClientError)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let final_url = response.url().to_string();

        if mode == FetchMode::Standard && !status.is_success() {
            return Err(FetchError::StatusError(status.as_u16()));
        }

        let body = response.text().await?;

        if mode == FetchMode::Standard && !looks_like_html(&body) {
            return Err(FetchError::NotHtml);
        }

        log::debug!("Fetched {} ({} bytes, status {})", final_url, body.len(), status);

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

/// Cheap sniff for an HTML document: a `<` tag opener within the leading
/// whitespace-trimmed prefix.
fn looks_like_html(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with('<') || {
        let prefix: String = trimmed.chars().take(256).collect::<String>().to_lowercase();
        prefix.contains("<html") || prefix.contains("<!doctype")
    }
}
