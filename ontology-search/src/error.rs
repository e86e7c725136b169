//! Error types for the ontology-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. No API keys or other credentials appear in
//! error messages.

/// Errors that can occur while searching ontology sources.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid configuration or a missing required credential.
    ///
    /// Raised at adapter construction time and never retried.
    #[error("config error: {0}")]
    Config(String),

    /// A source identifier that is not in the registry was requested.
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// The requested start index is at or beyond the total reported by a source.
    #[error("start_index ({start_index}) exceeds total available results ({total})")]
    PaginationRange {
        /// Requested row offset.
        start_index: usize,
        /// Total result count reported by the source.
        total: usize,
    },

    /// An HTTP request to a source failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A source response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A source did not answer within its fetch timeout.
    #[error("source timed out: {0}")]
    Timeout(String),

    /// The request was cancelled or its deadline passed.
    #[error("request cancelled: {0}")]
    Cancelled(String),
}

/// Convenience type alias for ontology-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
