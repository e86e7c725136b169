//! # ontology-search
//!
//! Harmonised biomedical ontology concept search across independent lookup
//! services.
//!
//! This crate queries several ontology APIs for the same logical page of
//! results, maps every service's native records into one canonical shape,
//! and returns a single deduplicated, validated response with an accurate
//! "more results available" signal for incremental paging.
//!
//! ## Design
//!
//! - One adapter per service: OLS keyword search (`ols`), OLS v2 entity
//!   search (`ols2`), and UMLS (`umls`, needs an API key)
//! - Sources are queried concurrently and joined in request order
//! - Graceful degradation: a failed, slow or exhausted source contributes
//!   zero records while the others still return results
//! - Curation deduplicates by concept IRI, normalises fields, and drops
//!   records whose ontology or coding system could not be resolved
//!
//! ## Security
//!
//! - API keys are read once, at adapter construction
//! - Keys are redacted from the echoed query and never appear in errors
//! - Search keywords are logged only at trace level

pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod registry;
pub mod source;
pub mod sources;
pub mod types;

pub use config::{SearchConfig, SourceEndpoints};
pub use credentials::{CredentialSource, EnvCredentials, StaticCredentials};
pub use error::{Result, SearchError};
pub use http::{HttpFetcher, JsonFetcher};
pub use orchestrator::{RequestContext, SearchResponse};
pub use source::SourceAdapter;
pub use types::{CanonicalRecord, OntologyLookup, SearchRequest, SourceId};

/// Search the requested sources over HTTP.
///
/// Builds an [`HttpFetcher`] from `config` and runs the request with a
/// fresh [`RequestContext`].
///
/// # Errors
///
/// Returns [`SearchError::UnknownSource`] for an unregistered source name and
/// [`SearchError::Config`] for invalid configuration or a missing
/// credential. Failures of individual sources are logged and yield partial
/// results instead.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> ontology_search::Result<()> {
/// use ontology_search::{EnvCredentials, OntologyLookup, SearchConfig, SearchRequest};
///
/// let request = SearchRequest::new("aspirin", &["ols"], 10);
/// let response = ontology_search::search(
///     &request,
///     &SearchConfig::default(),
///     &OntologyLookup::empty(),
///     &EnvCredentials,
/// )
/// .await?;
/// for record in &response.results {
///     println!("{}: {}", record.code, record.display);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(
    request: &SearchRequest,
    config: &SearchConfig,
    lookup: &OntologyLookup,
    credentials: &impl CredentialSource,
) -> Result<SearchResponse> {
    search_with_context(request, config, lookup, credentials, &RequestContext::new()).await
}

/// Like [`search`], but honours the caller's cancellation token and deadline.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_with_context(
    request: &SearchRequest,
    config: &SearchConfig,
    lookup: &OntologyLookup,
    credentials: &impl CredentialSource,
    ctx: &RequestContext,
) -> Result<SearchResponse> {
    config.validate()?;
    let fetcher = HttpFetcher::new(config)?;
    orchestrator::run(&fetcher, credentials, config, lookup, request, ctx).await
}
