//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls per-source timeouts, fan-out width, page-size
//! limits and the base URL of every source. The defaults point at the
//! public services.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SourceId;

/// Page size above which the OLS family of services truncates responses.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 500;

/// Base URLs for every registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceEndpoints {
    /// OLS keyword search root (the `search` path is appended).
    pub ols: String,
    /// OLS v2 entity search endpoint.
    pub ols2: String,
    /// UMLS search endpoint.
    pub umls: String,
}

impl Default for SourceEndpoints {
    fn default() -> Self {
        Self {
            ols: "https://www.ebi.ac.uk/ols4/api/".to_owned(),
            ols2: "https://www.ebi.ac.uk/ols4/api/v2/entities".to_owned(),
            umls: "https://uts-ws.nlm.nih.gov/rest/search/current".to_owned(),
        }
    }
}

impl SourceEndpoints {
    /// Every endpoint pointing below one root. Used for mirrors and tests.
    pub fn with_root(root: &str) -> Self {
        let root = root.trim_end_matches('/');
        Self {
            ols: format!("{root}/ols4/api/"),
            ols2: format!("{root}/ols4/api/v2/entities"),
            umls: format!("{root}/rest/search/current"),
        }
    }

    /// Base URL for `source`.
    pub fn for_source(&self, source: SourceId) -> &str {
        match source {
            SourceId::Ols => &self.ols,
            SourceId::OlsCode => &self.ols2,
            SourceId::Umls => &self.umls,
        }
    }
}

/// Configuration for a search operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Per-source fetch timeout in seconds. A timeout counts as a failed
    /// fetch for that source only.
    pub timeout_seconds: u64,
    /// Upper bound on sources fetched at the same time.
    pub max_concurrent_sources: usize,
    /// Page size the services honour. Larger requests are logged, not rejected.
    pub max_page_size: usize,
    /// Custom User-Agent. If `None`, the crate name and version are sent.
    pub user_agent: Option<String>,
    /// Where each source lives.
    pub endpoints: SourceEndpoints,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            max_concurrent_sources: 4,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            user_agent: None,
            endpoints: SourceEndpoints::default(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `timeout_seconds` must be greater than 0
    /// - `max_concurrent_sources` must be greater than 0
    /// - `max_page_size` must be greater than 0
    /// - every endpoint must be non-empty
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_sources == 0 {
            return Err(SearchError::Config(
                "max_concurrent_sources must be greater than 0".into(),
            ));
        }
        if self.max_page_size == 0 {
            return Err(SearchError::Config(
                "max_page_size must be greater than 0".into(),
            ));
        }
        for source in SourceId::all() {
            if self.endpoints.for_source(*source).trim().is_empty() {
                return Err(SearchError::Config(format!(
                    "endpoint for '{source}' must not be empty"
                )));
            }
        }
        Ok(())
    }
}
