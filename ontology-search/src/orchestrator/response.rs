//! Final response assembly and credential redaction.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::types::CanonicalRecord;

use super::curate::count_per_ontology;

/// Token that replaces credential values in the echoed query.
pub const REDACTION_PLACEHOLDER: &str = "{{REDACTED}}";

/// The aggregated result set for one request.
///
/// Built once per request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The source URLs that were queried, with credentials redacted.
    pub search_query: String,
    /// Curated records in source-resolution order.
    pub results: Vec<CanonicalRecord>,
    /// Number of results per ontology prefix.
    pub results_per_ontology: BTreeMap<String, usize>,
    /// Always equal to `results.len()`.
    pub results_count: usize,
    /// Whether any source reported another page.
    pub more_results_available: bool,
}

/// Assemble the response from curated records.
pub fn build_response(
    records: Vec<CanonicalRecord>,
    raw_query: &str,
    more_available: bool,
) -> SearchResponse {
    SearchResponse {
        search_query: redact_query(raw_query),
        results_per_ontology: count_per_ontology(&records),
        results_count: records.len(),
        results: records,
        more_results_available: more_available,
    }
}

fn credential_param() -> &'static Regex {
    static CREDENTIAL_PARAM: OnceLock<Regex> = OnceLock::new();
    CREDENTIAL_PARAM.get_or_init(|| {
        Regex::new(r"(?i)(^|[?&\s])((?:api)?key)=[^&\s]*")
            .expect("credential parameter pattern is a valid literal")
    })
}

/// Replace `key=` and `apiKey=` values (any case) with [`REDACTION_PLACEHOLDER`].
///
/// Values run to the next `&` or the end of the URL. Other parameters are
/// left untouched.
pub fn redact_query(query: &str) -> String {
    credential_param()
        .replace_all(query, |caps: &Captures<'_>| {
            format!("{}{}={REDACTION_PLACEHOLDER}", &caps[1], &caps[2])
        })
        .into_owned()
}
