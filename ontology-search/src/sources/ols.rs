//! OLS keyword search: full-text search across EBI's ontology index.
//!
//! Uses `{base}search` with row/start paging. Records live under
//! `response.docs` and the total under `response.numFound`.

use serde_json::Value;

use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::source::SourceAdapter;
use crate::types::{HarmonizedRecord, OntologyLookup, SourceId, SourcePage};

use super::{
    collect_json_page, escape_keyword, join_ontologies, normalize_prefix, resolve_system,
    string_field, PageLayout,
};

const LAYOUT: PageLayout = PageLayout {
    records: "/response/docs",
    total: "/response/numFound",
};

/// Characters that break downstream consumers when they appear in a code.
const PROBLEM_CODE_CHARS: &[char] = &['/'];

/// OLS keyword search adapter.
#[derive(Debug, Clone)]
pub struct OlsSource {
    base_url: String,
    max_page_size: usize,
}

impl OlsSource {
    pub fn new(base_url: impl Into<String>, max_page_size: usize) -> Self {
        Self {
            base_url: base_url.into(),
            max_page_size,
        }
    }
}

impl SourceAdapter for OlsSource {
    fn source_id(&self) -> SourceId {
        SourceId::Ols
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
        let mut params = vec![format!("q={}", escape_keyword(keyword, false))];
        if !ontology_filter.is_empty() {
            params.push(format!("ontology={}", join_ontologies(ontology_filter)));
        }
        params.push(format!("rows={page_size}"));
        params.push(format!("start={start_index}"));

        format!(
            "{}/search?{}",
            self.base_url.trim_end_matches('/'),
            params.join("&")
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
            SourceId::Ols,
            LAYOUT,
            fetcher,
            url,
            page_size,
            start_index,
            self.max_page_size,
        )
        .await
    }

    fn harmonize_record(&self, native: &Value, lookup: &OntologyLookup) -> HarmonizedRecord {
        let code = string_field(native, "obo_id");
        // Fall back to the curie's namespace when the explicit prefix is missing.
        let raw_prefix = string_field(native, "ontology_prefix").or_else(|| {
            code.as_deref()
                .and_then(|c| c.split_once(':'))
                .map(|(prefix, _)| prefix.to_owned())
        });
        let ontology_prefix = normalize_prefix(raw_prefix.as_deref());
        let system = resolve_system(lookup, &ontology_prefix);

        HarmonizedRecord {
            code,
            system: Some(system),
            code_iri: string_field(native, "iri"),
            display: string_field(native, "label"),
            description: native.get("description").cloned(),
            ontology_prefix: Some(ontology_prefix),
        }
    }

    fn clean(&self, records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
        let before = records.len();
        let kept: Vec<HarmonizedRecord> = records
            .into_iter()
            .filter(|record| {
                !record
                    .code
                    .as_deref()
                    .is_some_and(|code| code.contains(PROBLEM_CODE_CHARS))
            })
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            tracing::info!(source = %SourceId::Ols, removed, "problem codes removed");
        }
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::testing::FixedFetcher;
    use crate::types::{CURIE_SENTINEL, SYSTEM_SENTINEL};
    use serde_json::json;

    fn source() -> OlsSource {
        OlsSource::new("https://www.ebi.ac.uk/ols4/api/", 500)
    }

    fn lookup() -> OntologyLookup {
        [("MONDO".to_string(), "http://purl.obolibrary.org/obo/mondo.owl".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn build_url_with_filter() {
        let url = source().build_url("brain cancer", &["mondo".into(), "hp".into()], 20, 10);
        assert_eq!(
            url,
            "https://www.ebi.ac.uk/ols4/api/search?q=brain%20cancer&ontology=mondo,hp&rows=10&start=20"
        );
    }

    #[test]
    fn build_url_without_filter_omits_ontology() {
        let url = source().build_url("aspirin", &[], 0, 50);
        assert_eq!(
            url,
            "https://www.ebi.ac.uk/ols4/api/search?q=aspirin&rows=50&start=0"
        );
    }

    #[test]
    fn build_url_keeps_colons() {
        let url = source().build_url("MONDO:0005015", &[], 0, 10);
        assert!(url.contains("q=MONDO:0005015"));
    }

    fn query_pairs(url: &str) -> (Vec<(String, String)>, Option<String>) {
        let parsed = url::Url::parse(url).expect("valid url");
        let pairs = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        (pairs, parsed.fragment().map(str::to_owned))
    }

    #[test]
    fn build_url_keeps_delimiters_inside_the_keyword() {
        let (pairs, fragment) = query_pairs(&source().build_url("aspirin & caffeine", &[], 20, 10));
        assert_eq!(
            pairs,
            [
                ("q".to_owned(), "aspirin & caffeine".to_owned()),
                ("rows".to_owned(), "10".to_owned()),
                ("start".to_owned(), "20".to_owned()),
            ]
        );
        assert!(fragment.is_none());

        let (pairs, fragment) = query_pairs(&source().build_url("C# programming", &[], 20, 10));
        assert_eq!(pairs[0], ("q".to_owned(), "C# programming".to_owned()));
        assert_eq!(pairs.len(), 3);
        assert!(fragment.is_none());

        let (pairs, _) = query_pairs(&source().build_url("vitamin b+c", &[], 0, 10));
        assert_eq!(pairs[0].1, "vitamin b+c");
    }

    #[test]
    fn harmonize_maps_native_fields() {
        let native = json!({
            "obo_id": "MONDO:0005015",
            "iri": "http://purl.obolibrary.org/obo/MONDO_0005015",
            "label": "diabetes mellitus",
            "description": ["A metabolic disease."],
            "ontology_prefix": "mondo"
        });
        let record = source().harmonize_record(&native, &lookup());
        assert_eq!(record.code.as_deref(), Some("MONDO:0005015"));
        assert_eq!(record.ontology_prefix.as_deref(), Some("MONDO"));
        assert_eq!(
            record.system.as_deref(),
            Some("http://purl.obolibrary.org/obo/mondo.owl")
        );
        assert_eq!(record.display.as_deref(), Some("diabetes mellitus"));
        assert_eq!(record.description, Some(json!(["A metabolic disease."])));
    }

    #[test]
    fn harmonize_derives_prefix_from_curie() {
        let native = json!({"obo_id": "MONDO:1", "iri": "http://x/1"});
        let record = source().harmonize_record(&native, &lookup());
        assert_eq!(record.ontology_prefix.as_deref(), Some("MONDO"));
    }

    #[test]
    fn harmonize_marks_missing_prefix() {
        let native = json!({"iri": "http://x/1", "label": "orphan"});
        let record = source().harmonize_record(&native, &lookup());
        assert_eq!(record.ontology_prefix.as_deref(), Some(CURIE_SENTINEL));
    }

    #[test]
    fn harmonize_marks_unknown_system() {
        let native = json!({"obo_id": "HP:1", "ontology_prefix": "HP"});
        let record = source().harmonize_record(&native, &lookup());
        assert_eq!(record.system.as_deref(), Some(SYSTEM_SENTINEL));
    }

    #[test]
    fn clean_drops_problem_codes() {
        let records = vec![
            HarmonizedRecord {
                code: Some("NCIT:C1/2".into()),
                ..Default::default()
            },
            HarmonizedRecord {
                code: Some("NCIT:C3".into()),
                ..Default::default()
            },
            HarmonizedRecord::default(),
        ];
        let cleaned = source().clean(records);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned[0].code.as_deref(), Some("NCIT:C3"));
    }

    #[tokio::test]
    async fn collect_page_reads_docs_and_num_found() {
        let fetcher = FixedFetcher(json!({
            "response": {
                "numFound": 2,
                "docs": [{"iri": "http://x/1"}, {"iri": "http://x/2"}]
            }
        }));
        let page = source()
            .collect_page(&fetcher, "u", 10, 0)
            .await
            .expect("in range");
        assert_eq!(page.records.len(), 2);
        assert!(!page.more_available);
    }
}
