//! Source adapter implementations.
//!
//! Each module provides a struct implementing [`crate::source::SourceAdapter`]
//! for one lookup service. The helpers here hold the query and paging
//! conventions the services share.

pub mod ols;
pub mod ols_code;
pub mod umls;

pub use ols::OlsSource;
pub use ols_code::OlsCodeSource;
pub use umls::UmlsSource;

use serde_json::Value;

use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::types::{OntologyLookup, SourceId, SourcePage, CURIE_SENTINEL, SYSTEM_SENTINEL};

/// Where a service puts its records and its total count, as JSON pointers.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PageLayout {
    pub records: &'static str,
    pub total: &'static str,
}

/// Percent-encode a keyword as one query value.
///
/// Colons are left readable unless `escape_colon` is set, since curie-style
/// codes search better verbatim on the keyword endpoints.
pub(crate) fn escape_keyword(keyword: &str, escape_colon: bool) -> String {
    let encoded = urlencoding::encode(keyword);
    if escape_colon {
        encoded.into_owned()
    } else {
        encoded.replace("%3A", ":")
    }
}

/// Comma-join an ontology filter list, encoding each entry.
pub(crate) fn join_ontologies(ontology_filter: &[String]) -> String {
    ontology_filter
        .iter()
        .map(|ontology| urlencoding::encode(ontology))
        .collect::<Vec<_>>()
        .join(",")
}

/// Zero-based page number containing row `start_index`.
pub(crate) fn page_number(start_index: usize, page_size: usize) -> usize {
    start_index / page_size.max(1)
}

/// Drop the rows a page-numbered fetch returned before `start_index`.
///
/// Page-numbered services can only start at a page boundary, so an offset
/// that is not a multiple of `page_size` fetches the page containing it.
pub(crate) fn align_to_offset(
    source: SourceId,
    mut page: SourcePage,
    start_index: usize,
    page_size: usize,
) -> SourcePage {
    let skip = start_index % page_size.max(1);
    if skip > 0 {
        tracing::debug!(
            %source,
            start_index,
            page_size,
            skip,
            "start index is not page aligned, dropping leading rows"
        );
        page.records.drain(..skip.min(page.records.len()));
    }
    page
}

/// Normalise a prefix to uppercase, or mark it unparsable.
pub(crate) fn normalize_prefix(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(prefix) if !prefix.is_empty() && !prefix.contains(char::is_whitespace) => {
            prefix.to_uppercase()
        }
        _ => CURIE_SENTINEL.to_owned(),
    }
}

/// Resolve a prefix to its coding system.
///
/// An empty lookup table means the table could not be loaded; every system
/// is then left empty instead of being marked invalid.
pub(crate) fn resolve_system(lookup: &OntologyLookup, prefix: &str) -> String {
    if prefix == CURIE_SENTINEL || lookup.is_empty() {
        return String::new();
    }
    lookup
        .get(prefix)
        .map_or_else(|| SYSTEM_SENTINEL.to_owned(), str::to_owned)
}

/// First string in `value` if it is an array, or `value` itself if it is a string.
pub(crate) fn first_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().map(str::to_owned)),
        _ => None,
    }
}

/// Owned string field of a JSON object.
pub(crate) fn string_field(native: &Value, key: &str) -> Option<String> {
    native.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// Fetch one page and apply the shared termination rules.
///
/// Fetch and decode failures are logged and produce an empty page. A
/// `start_index` at or beyond the reported total is a boundary violation.
pub(crate) async fn collect_json_page<F: JsonFetcher>(
    source: SourceId,
    layout: PageLayout,
    fetcher: &F,
    url: &str,
    page_size: usize,
    start_index: usize,
    max_page_size: usize,
) -> Result<SourcePage, SearchError> {
    if page_size > max_page_size {
        tracing::warn!(
            %source,
            page_size,
            max_page_size,
            "page size exceeds the source maximum, results may be truncated"
        );
    }

    let data = match fetcher.fetch_json(url).await {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(%source, error = %err, "source fetch failed");
            return Ok(SourcePage::empty());
        }
    };

    let total = match data.pointer(layout.total).and_then(Value::as_u64) {
        Some(total) => usize::try_from(total).unwrap_or(usize::MAX),
        None => {
            tracing::warn!(%source, field = layout.total, "response has no total count");
            return Ok(SourcePage::empty());
        }
    };
    let records = data
        .pointer(layout.records)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    tracing::debug!(%source, total, count = records.len(), start_index, "page collected");

    if start_index >= total {
        return Err(SearchError::PaginationRange { start_index, total });
    }

    Ok(SourcePage {
        records,
        more_available: start_index.saturating_add(page_size) < total,
    })
}
