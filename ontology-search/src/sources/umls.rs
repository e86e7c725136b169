//! UMLS terminology search against NLM's Unified Medical Language System.
//!
//! Requires an API key, read once when the adapter is constructed. Pages
//! by 1-based page number. Records live under `result.results` and the
//! total under `result.recCount`.

use std::fmt;

use serde_json::Value;

use crate::credentials::{CredentialSource, UMLS_API_KEY};
use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::source::SourceAdapter;
use crate::types::{HarmonizedRecord, OntologyLookup, SourceId, SourcePage};

use super::{
    align_to_offset, collect_json_page, escape_keyword, join_ontologies, normalize_prefix,
    page_number, resolve_system, string_field, PageLayout,
};

const LAYOUT: PageLayout = PageLayout {
    records: "/result/results",
    total: "/result/recCount",
};

/// Identifier UMLS returns in its single placeholder row when nothing matched.
const NO_RESULTS_UI: &str = "NONE";

/// UMLS search adapter.
#[derive(Clone)]
pub struct UmlsSource {
    base_url: String,
    max_page_size: usize,
    api_key: String,
}

impl UmlsSource {
    /// Create the adapter, reading the API key from `credentials`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `UMLS_API_KEY` is missing or blank.
    pub fn new(
        base_url: impl Into<String>,
        max_page_size: usize,
        credentials: &impl CredentialSource,
    ) -> Result<Self, SearchError> {
        let api_key = credentials.non_blank(UMLS_API_KEY).ok_or_else(|| {
            SearchError::Config(format!(
                "API key for 'umls' is not set ({UMLS_API_KEY})"
            ))
        })?;
        Ok(Self {
            base_url: base_url.into(),
            max_page_size,
            api_key,
        })
    }
}

impl fmt::Debug for UmlsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UmlsSource")
            .field("base_url", &self.base_url)
            .field("max_page_size", &self.max_page_size)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SourceAdapter for UmlsSource {
    fn source_id(&self) -> SourceId {
        SourceId::Umls
    }

    fn supports_ontology_filter(&self) -> bool {
        true
    }

    fn build_url(
        &self,
        keyword: &str,
        ontology_filter: &[String],
        start_index: usize,
        page_size: usize,
    ) -> String {
        let mut params = vec![format!("string={}", escape_keyword(keyword, false))];
        if !ontology_filter.is_empty() {
            params.push(format!("sabs={}", join_ontologies(ontology_filter)));
        }
        params.push(format!(
            "pageNumber={}",
            page_number(start_index, page_size) + 1
        ));
        params.push(format!("pageSize={page_size}"));
        params.push("returnIdType=code".to_owned());
        params.push(format!("apiKey={}", self.api_key));

        format!("{}?{}", self.base_url.trim_end_matches('/'), params.join("&"))
    }

    async fn collect_page<F: JsonFetcher>(
        &self,
        fetcher: &F,
        url: &str,
        page_size: usize,
        start_index: usize,
    ) -> Result<SourcePage, SearchError> {
        collect_json_page(
            SourceId::Umls,
            LAYOUT,
            fetcher,
            url,
            page_size,
            start_index,
            self.max_page_size,
        )
        .await
        .map(|page| align_to_offset(SourceId::Umls, page, start_index, page_size))
    }

    fn harmonize_record(&self, native: &Value, lookup: &OntologyLookup) -> HarmonizedRecord {
        let root_source = string_field(native, "rootSource");
        let ontology_prefix = normalize_prefix(root_source.as_deref());
        let system = resolve_system(lookup, &ontology_prefix);
        let name = string_field(native, "name");

        HarmonizedRecord {
            code: string_field(native, "ui"),
            system: Some(system),
            code_iri: string_field(native, "uri"),
            description: name.clone().map(Value::String),
            display: name,
            ontology_prefix: Some(ontology_prefix),
        }
    }

    fn clean(&self, records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
        let before = records.len();
        let kept: Vec<HarmonizedRecord> = records
            .into_iter()
            .filter(|record| record.code.as_deref() != Some(NO_RESULTS_UI))
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            tracing::info!(source = %SourceId::Umls, removed, "no-results placeholders removed");
        }
        kept
    }
}
