//! Core aggregator: concurrent per-source fetch, harmonise, combine, curate.
//!
//! Every requested source is asked for the same logical page. Sources run
//! concurrently up to `max_concurrent_sources`, and their records are
//! concatenated in resolution order before curation.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::config::SearchConfig;
use crate::credentials::CredentialSource;
use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::registry::{resolve, Source};
use crate::source::SourceAdapter;
use crate::types::{HarmonizedRecord, OntologyLookup, SearchRequest, SourceId, SourcePage};

use super::context::RequestContext;
use super::curate::curate;
use super::response::{build_response, SearchResponse};

/// What one source contributed to a request.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    pub source: SourceId,
    /// The URL that was queried. May carry a credential.
    pub url: String,
    /// Harmonised and cleaned records, in source order.
    pub records: Vec<HarmonizedRecord>,
    pub more_available: bool,
}

/// Run one search request across all requested sources.
///
/// # Pipeline
///
/// 1. Resolve adapters from `request.sources`
/// 2. Fan out one task per adapter: build URL, fetch the page, harmonise, clean
/// 3. Degrade any failed, timed-out, cancelled or out-of-range source to zero records
/// 4. OR together every source's `more_available`
/// 5. Concatenate records in resolution order and curate
/// 6. Build the response with the redacted query
///
/// # Errors
///
/// Returns [`SearchError::UnknownSource`] or [`SearchError::Config`] only.
/// Per-source failures never abort the request.
pub async fn run<F, C>(
    fetcher: &F,
    credentials: &C,
    config: &SearchConfig,
    lookup: &OntologyLookup,
    request: &SearchRequest,
    ctx: &RequestContext,
) -> Result<SearchResponse, SearchError>
where
    F: JsonFetcher,
    C: CredentialSource,
{
    config.validate()?;
    let adapters = resolve(&request.sources, config, credentials)?;

    async {
        tracing::trace!(keyword = %request.keyword, "search started");
        let outcomes = fetch_all(fetcher, config, lookup, request, ctx, &adapters).await;

        let more_available = outcomes.iter().any(|o| o.more_available);
        let query = outcomes
            .iter()
            .map(|o| o.url.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let combined: Vec<HarmonizedRecord> =
            outcomes.into_iter().flat_map(|o| o.records).collect();
        tracing::debug!(count = combined.len(), "records combined");

        let curated = curate(combined);
        let response = build_response(curated, &query, more_available);
        tracing::info!(
            results = response.results_count,
            more = response.more_results_available,
            "search finished"
        );
        Ok(response)
    }
    .instrument(ctx.span().clone())
    .await
}

/// Fetch every adapter's page concurrently, preserving adapter order.
pub async fn fetch_all<F: JsonFetcher>(
    fetcher: &F,
    config: &SearchConfig,
    lookup: &OntologyLookup,
    request: &SearchRequest,
    ctx: &RequestContext,
    adapters: &[Source],
) -> Vec<SourceOutcome> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    stream::iter(adapters)
        .map(|adapter| {
            let span = tracing::debug_span!(
                parent: ctx.span(),
                "source",
                source = %adapter.source_id()
            );
            fetch_source(adapter, fetcher, lookup, request, timeout, ctx).instrument(span)
        })
        .buffered(config.max_concurrent_sources.max(1))
        .collect()
        .await
}

/// Fetch, harmonise and clean one source's page.
///
/// Never fails: every problem is logged and yields an empty contribution.
pub async fn fetch_source<A, F>(
    adapter: &A,
    fetcher: &F,
    lookup: &OntologyLookup,
    request: &SearchRequest,
    timeout: Duration,
    ctx: &RequestContext,
) -> SourceOutcome
where
    A: SourceAdapter,
    F: JsonFetcher,
{
    let source = adapter.source_id();
    let url = adapter.build_url(
        &request.keyword,
        &request.ontology_filter,
        request.start_index,
        request.page_size,
    );
    if !request.ontology_filter.is_empty() && !adapter.supports_ontology_filter() {
        tracing::debug!(%source, "ontology filter not supported server-side, ignored");
    }

    let fetched: Result<SourcePage, SearchError> = tokio::select! {
        biased;
        () = ctx.done() => Err(SearchError::Cancelled(format!(
            "{source} had not answered"
        ))),
        outcome = tokio::time::timeout(
            timeout,
            adapter.collect_page(fetcher, &url, request.page_size, request.start_index),
        ) => outcome.unwrap_or_else(|_elapsed| {
            Err(SearchError::Timeout(format!(
                "{source} exceeded {}s",
                timeout.as_secs()
            )))
        }),
    };

    let page = match fetched {
        Ok(page) => page,
        Err(SearchError::PaginationRange { start_index, total }) => {
            tracing::info!(%source, start_index, total, "no more pages from source");
            SourcePage::empty()
        }
        Err(err) => {
            tracing::warn!(%source, error = %err, "source contributed no records");
            SourcePage::empty()
        }
    };

    let native = page.records.len();
    let records = adapter.clean(adapter.harmonize(&page.records, lookup));
    tracing::debug!(
        %source,
        fetched = native,
        kept = records.len(),
        more = page.more_available,
        "source finished"
    );

    SourceOutcome {
        source,
        url,
        records,
        more_available: page.more_available,
    }
}
