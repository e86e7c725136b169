//! The HTTP fetch collaborator: one GET, parsed as JSON.
//!
//! Sources never talk to the network directly. They go through a
//! [`JsonFetcher`], which lets tests substitute deterministic stubs.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;
use url::Url;

use crate::config::SearchConfig;
use crate::error::SearchError;

/// Performs a single GET and returns the decoded JSON body.
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` and decode its body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] for transport failures and non-success
    /// statuses, and [`SearchError::Parse`] when the body is not JSON.
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, SearchError>> + Send;
}

/// [`JsonFetcher`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher using the timeout and User-Agent from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &str) -> Result<Value, SearchError> {
        let parsed =
            Url::parse(url).map_err(|e| SearchError::Parse(format!("invalid source URL: {e}")))?;

        // reqwest errors embed the request URL, which may carry an API key.
        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| SearchError::Http(format!("request failed: {}", e.without_url())))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("bad status: {}", e.without_url())))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::Parse(format!("response is not JSON: {}", e.without_url())))
    }
}

impl<T: JsonFetcher + ?Sized> JsonFetcher for &T {
    fn fetch_json(&self, url: &str) -> impl Future<Output = Result<Value, SearchError>> + Send {
        (**self).fetch_json(url)
    }
}

/// Build a [`reqwest::Client`] configured for source API requests.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => default_user_agent(),
    };

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// `ontology-search/<version>`.
pub fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
