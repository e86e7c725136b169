//! Error types for the search-dragon host layer.

use ontology_search::SearchError;

/// Top-level error type for configuration, lookup loading and searches.
#[derive(Debug, thiserror::Error)]
pub enum DragonError {
    /// A search failed in a way that aborts the request.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file error.
    #[error("config error: {0}")]
    Config(String),

    /// Ontology lookup table error.
    #[error("lookup error: {0}")]
    Lookup(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, DragonError>;
