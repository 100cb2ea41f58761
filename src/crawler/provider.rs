//! Document provider seam and the built-in HTTP implementation
//!
//! The controller never talks to the network directly; it asks a
//! [`DocumentProvider`] for a rendered document. The built-in
//! [`HttpProvider`] fetches over plain HTTP and satisfies the bounded
//! structure wait by re-polling the URL until the expected selector
//! appears or the wait elapses. Rendering engines with real JavaScript
//! execution plug in behind the same trait.

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

/// Interval between structure-wait polls
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// A fetched, rendered page
///
/// Owned exclusively by one controller cycle and dropped on every exit
/// path of that cycle; never shared across workers.
#[derive(Debug)]
pub struct Document {
    url: Url,
    html: String,
}

impl Document {
    pub fn new(url: Url, html: String) -> Self {
        Self { url, html }
    }

    /// Final URL of the page (after any redirects)
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The rendered markup snapshot
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Per-fetch options handed to the provider
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Structure the page is expected to render; the provider waits for it
    pub wait_for: Option<Selector>,

    /// Upper bound on the structure wait
    pub structure_wait: Duration,

    /// Verbose provider logging; never changes what is fetched
    pub debug: bool,
}

impl FetchOptions {
    /// Options with no structure wait
    pub fn bare() -> Self {
        Self {
            wait_for: None,
            structure_wait: Duration::ZERO,
            debug: false,
        }
    }
}

/// Errors a fetch can fail with; all of them are retryable
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },
}

/// Source of rendered documents
///
/// Implementations must support a bounded "wait until the expected
/// structure appears" as part of the fetch.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Document, FetchError>;
}

/// HTTP-backed document provider
pub struct HttpProvider {
    client: Client,
}

impl HttpProvider {
    /// Builds the provider with the configured network identity
    ///
    /// # Arguments
    ///
    /// * `config` - Network identity configuration
    /// * `request_timeout` - Per-request bound applied at the client level
    pub fn new(config: &FetchConfig, request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    async fn fetch_once(&self, url: &Url, debug: bool) -> Result<Document, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if debug {
            tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
        }

        Ok(Document::new(final_url, body))
    }
}

#[async_trait]
impl DocumentProvider for HttpProvider {
    async fn fetch(&self, url: &Url, options: &FetchOptions) -> Result<Document, FetchError> {
        let deadline = Instant::now() + options.structure_wait;
        let mut document = self.fetch_once(url, options.debug).await?;

        if let Some(selector) = &options.wait_for {
            while !has_structure(&document, selector) && Instant::now() < deadline {
                tokio::time::sleep(POLL_INTERVAL).await;

                match self.fetch_once(url, options.debug).await {
                    Ok(snapshot) => document = snapshot,
                    Err(e) => {
                        // Keep the last good snapshot; the classifier
                        // decides what an unmatched page means.
                        tracing::debug!("Structure-wait re-poll of {} failed: {}", url, e);
                        break;
                    }
                }
            }
        }

        Ok(document)
    }
}

/// Checks the snapshot for the awaited structure
fn has_structure(document: &Document, selector: &Selector) -> bool {
    let html = Html::parse_document(document.html());
    html.select(selector).next().is_some()
}

fn classify_send_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
