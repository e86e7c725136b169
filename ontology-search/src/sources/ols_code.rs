//! OLS v2 entity search, more reliable when the keyword is a code such as
//! `HP:0003045`.
//!
//! Pages by page number and size. Records live under `elements` and the
//! total under `totalElements`. The endpoint has no usable ontology filter.

use serde_json::Value;

use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::orchestrator::curate::deduplicate;
use crate::source::SourceAdapter;
use crate::types::{HarmonizedRecord, OntologyLookup, SourceId, SourcePage};

use super::{
    align_to_offset, collect_json_page, escape_keyword, first_string, normalize_prefix,
    page_number, resolve_system, string_field, PageLayout,
};

const LAYOUT: PageLayout = PageLayout {
    records: "/elements",
    total: "/totalElements",
};

/// OLS v2 entity search adapter.
#[derive(Debug, Clone)]
pub struct OlsCodeSource {
    base_url: String,
    max_page_size: usize,
}

impl OlsCodeSource {
    pub fn new(base_url: impl Into<String>, max_page_size: usize) -> Self {
        Self {
            base_url: base_url.into(),
            max_page_size,
        }
    }
}

impl SourceAdapter for OlsCodeSource {
    fn source_id(&self) -> SourceId {
        SourceId::OlsCode
    }

    fn supports_ontology_filter(&self) -> bool {
        false
    }

    fn build_url(
        &self,
        keyword: &str,
        _ontology_filter: &[String],
        start_index: usize,
        page_size: usize,
    ) -> String {
        format!(
            "{}?search={}&page={}&size={page_size}",
            self.base_url.trim_end_matches('/'),
            escape_keyword(keyword, true),
            page_number(start_index, page_size),
        )
    }

    async fn collect_page<F: JsonFetcher>(
        &self,
        fetcher: &F,
        url: &str,
        page_size: usize,
        start_index: usize,
    ) -> Result<SourcePage, SearchError> {
        collect_json_page(
            SourceId::OlsCode,
            LAYOUT,
            fetcher,
            url,
            page_size,
            start_index,
            self.max_page_size,
        )
        .await
        .map(|page| align_to_offset(SourceId::OlsCode, page, start_index, page_size))
    }

    fn harmonize_record(&self, native: &Value, lookup: &OntologyLookup) -> HarmonizedRecord {
        let defined_by = first_string(native.get("definedBy"));
        let ontology_prefix = normalize_prefix(defined_by.as_deref());
        let system = resolve_system(lookup, &ontology_prefix);
        let display = first_string(native.get("label"));

        HarmonizedRecord {
            code: string_field(native, "curie"),
            system: Some(system),
            code_iri: string_field(native, "iri"),
            description: display.clone().map(Value::String),
            display,
            ontology_prefix: Some(ontology_prefix),
        }
    }

    fn clean(&self, records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
        // The entity index lists one concept once per importing ontology.
        deduplicate(records)
    }
}
