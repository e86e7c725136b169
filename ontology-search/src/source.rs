//! Trait definition for pluggable ontology source adapters.
//!
//! Each lookup service (OLS keyword search, OLS v2 entity search, UMLS)
//! implements [`SourceAdapter`] to provide a uniform interface for query
//! construction, page collection, and harmonisation.

use std::future::Future;

use serde_json::Value;

use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::types::{HarmonizedRecord, OntologyLookup, SourceId, SourcePage};

/// A pluggable ontology source backend.
///
/// Implementors translate between one external API and the canonical record
/// shape. Each adapter handles its own:
///
/// - query URL construction (keyword escaping, filters, pagination names)
/// - page collection and the source's total-count field
/// - field mapping into [`HarmonizedRecord`]
/// - source-specific cleaning before results are combined
///
/// Harmonisation never drops records. Unresolvable prefixes and systems are
/// marked with the sentinels in [`crate::types`] and filtered by the curator.
///
/// All implementations must be `Send + Sync` for concurrent source queries.
pub trait SourceAdapter: Send + Sync {
    /// Which registered source this adapter talks to.
    fn source_id(&self) -> SourceId;

    /// Whether the service filters by ontology server-side. Filters passed
    /// to adapters without this capability are ignored.
    fn supports_ontology_filter(&self) -> bool;

    /// Build the URL for one page of results.
    fn build_url(
        &self,
        keyword: &str,
        ontology_filter: &[String],
        start_index: usize,
        page_size: usize,
    ) -> String;

    /// Fetch one page of native records.
    ///
    /// Transport and decoding failures are logged and yield
    /// [`SourcePage::empty()`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::PaginationRange`] only when `start_index` is at
    /// or beyond the total the source reports.
    fn collect_page<F: JsonFetcher>(
        &self,
        fetcher: &F,
        url: &str,
        page_size: usize,
        start_index: usize,
    ) -> impl Future<Output = Result<SourcePage, SearchError>> + Send;

    /// Map one native record into the canonical field set.
    fn harmonize_record(&self, native: &Value, lookup: &OntologyLookup) -> HarmonizedRecord;

    /// Harmonise a sequence element-wise, preserving order. Nested arrays
    /// are flattened in place.
    fn harmonize(&self, natives: &[Value], lookup: &OntologyLookup) -> Vec<HarmonizedRecord> {
        let mut out = Vec::with_capacity(natives.len());
        for native in natives {
            match native {
                Value::Array(inner) => out.extend(self.harmonize(inner, lookup)),
                other => out.push(self.harmonize_record(other, lookup)),
            }
        }
        out
    }

    /// Source-specific cleaning applied before results are combined.
    fn clean(&self, records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
        records
    }
}
