//! Search Dragon: harmonised ontology concept search for annotation tools.
//!
//! This crate is the host around [`ontology_search`]:
//! - **Config**: a TOML file with search settings, request defaults, the
//!   lookup table location and stored credentials
//! - **Credentials**: config-file values first, then the environment
//! - **Lookup**: loads the curie prefix → coding system CSV
//! - **CLI**: the `search-dragon` binary prints one response as JSON
//!
//! Adapters, aggregation and curation live in the `ontology-search` crate.

pub mod config;
pub mod credentials;
pub mod error;
pub mod lookup;

pub use config::{DragonConfig, RequestDefaults};
pub use credentials::LayeredCredentials;
pub use error::{DragonError, Result};
pub use lookup::load_ontology_lookup;
pub use ontology_search::{RequestContext, SearchRequest, SearchResponse};

/// Run one search with everything taken from `config`.
///
/// Loads the configured lookup table (an unreadable table degrades to an
/// empty one), layers config-file credentials over the environment, and
/// queries the sources named in `request`.
///
/// # Errors
///
/// Returns [`DragonError::Search`] for invalid settings, an unknown source
/// or a missing credential. Individual source failures only reduce the
/// results.
pub async fn run_search(
    config: &DragonConfig,
    request: &SearchRequest,
    ctx: &RequestContext,
) -> Result<SearchResponse> {
    let lookup = lookup::load_optional(config.lookup.path.as_deref());
    let credentials = LayeredCredentials::new(config.credentials.clone());
    let response =
        ontology_search::search_with_context(request, &config.search, &lookup, &credentials, ctx)
            .await?;
    Ok(response)
}
