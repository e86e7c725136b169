//! Cross-source curation of combined records.
//!
//! Runs in a fixed order: dedup by IRI, typed normalisation, sentinel
//! filtering. Per-ontology counts are taken from the curated set so they
//! always agree with the returned results.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::types::{CanonicalRecord, HarmonizedRecord, CURIE_SENTINEL, SYSTEM_SENTINEL};

/// Curate combined records from every source.
pub fn curate(records: Vec<HarmonizedRecord>) -> Vec<CanonicalRecord> {
    let deduped = deduplicate(records);
    let normalized = deduped.into_iter().map(normalize).collect();
    remove_sentinels(normalized)
}

/// Drop records whose non-empty `code_iri` was already seen.
///
/// The first occurrence wins. Records without an IRI are always kept.
pub fn deduplicate(records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
    let before = records.len();
    let mut seen: HashSet<String> = HashSet::new();
    let kept: Vec<HarmonizedRecord> = records
        .into_iter()
        .filter(|record| match record.dedup_key() {
            Some(iri) => seen.insert(iri.to_owned()),
            None => true,
        })
        .collect();

    let removed = before - kept.len();
    if removed > 0 {
        tracing::debug!(removed, "duplicate records removed by code_iri");
    }
    kept
}

/// Give every field its typed default.
pub fn normalize(record: HarmonizedRecord) -> CanonicalRecord {
    CanonicalRecord {
        code: record.code.unwrap_or_default(),
        system: record.system.unwrap_or_default(),
        code_iri: record.code_iri.unwrap_or_default(),
        display: record.display.unwrap_or_default(),
        description: normalize_description(record.description),
        ontology_prefix: record.ontology_prefix.unwrap_or_default(),
    }
}

/// Coerce a raw description into a list of strings.
///
/// Absent or null becomes empty, a bare string becomes one line, and arrays
/// keep their string and scalar members in order.
pub fn normalize_description(raw: Option<Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(s)) => vec![s],
        Some(Value::Array(items)) => items.into_iter().filter_map(scalar_text).collect(),
        Some(other) => scalar_text(other).into_iter().collect(),
    }
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Whether harmonisation marked this record invalid.
pub fn is_sentinel(record: &CanonicalRecord) -> bool {
    record.ontology_prefix == CURIE_SENTINEL || record.system == SYSTEM_SENTINEL
}

fn remove_sentinels(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let before = records.len();
    let kept: Vec<CanonicalRecord> = records.into_iter().filter(|r| !is_sentinel(r)).collect();
    let dropped = before - kept.len();
    if dropped > 0 {
        tracing::info!(dropped, "records with unresolved curie or system dropped");
    }
    kept
}

/// Number of records per `ontology_prefix`.
pub fn count_per_ontology(records: &[CanonicalRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.ontology_prefix.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_record(code: &str, iri: &str, prefix: &str) -> HarmonizedRecord {
        HarmonizedRecord {
            code: Some(code.to_string()),
            system: Some(format!("{prefix}-system")),
            code_iri: Some(iri.to_string()),
            display: Some(format!("Display {code}")),
            description: None,
            ontology_prefix: Some(prefix.to_string()),
        }
    }

    #[test]
    fn unique_iris_pass_through() {
        let records = vec![
            make_record("A:1", "http://x/1", "A"),
            make_record("A:2", "http://x/2", "A"),
        ];
        assert_eq!(deduplicate(records).len(), 2);
    }

    #[test]
    fn first_occurrence_wins() {
        let records = vec![
            make_record("MONDO:1", "http://x/1", "MONDO"),
            make_record("DOID:9", "http://x/1", "DOID"),
        ];
        let deduped = deduplicate(records);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].code.as_deref(), Some("MONDO:1"));
    }

    #[test]
    fn empty_iris_are_never_duplicates() {
        let records = vec![
            make_record("A:1", "", "A"),
            make_record("A:2", "", "A"),
            HarmonizedRecord::default(),
            HarmonizedRecord::default(),
        ];
        assert_eq!(deduplicate(records).len(), 4);
    }

    #[test]
    fn dedup_preserves_order() {
        let records = vec![
            make_record("A:1", "http://x/1", "A"),
            make_record("A:2", "http://x/2", "A"),
            make_record("A:1b", "http://x/1", "A"),
            make_record("A:3", "http://x/3", "A"),
        ];
        let codes: Vec<_> = deduplicate(records)
            .into_iter()
            .filter_map(|r| r.code)
            .collect();
        assert_eq!(codes, ["A:1", "A:2", "A:3"]);
    }

    #[test]
    fn normalize_fills_defaults() {
        let canonical = normalize(HarmonizedRecord::default());
        assert_eq!(canonical, CanonicalRecord::default());
        assert!(canonical.description.is_empty());
    }

    #[test]
    fn description_null_becomes_empty() {
        assert!(normalize_description(Some(Value::Null)).is_empty());
        assert!(normalize_description(None).is_empty());
    }

    #[test]
    fn description_bare_string_becomes_single_line() {
        assert_eq!(
            normalize_description(Some(json!("A drug."))),
            vec!["A drug.".to_string()]
        );
    }

    #[test]
    fn description_array_keeps_scalar_members() {
        assert_eq!(
            normalize_description(Some(json!(["one", null, 2, {"x": 1}, "three"]))),
            vec!["one".to_string(), "2".to_string(), "three".to_string()]
        );
    }

    #[test]
    fn sentinels_are_dropped() {
        let mut bad_curie = make_record("X:1", "http://x/1", CURIE_SENTINEL);
        bad_curie.system = Some(String::new());
        let mut bad_system = make_record("HP:1", "http://x/2", "HP");
        bad_system.system = Some(SYSTEM_SENTINEL.to_string());
        let good = make_record("MONDO:1", "http://x/3", "MONDO");

        let curated = curate(vec![bad_curie, bad_system, good]);
        assert_eq!(curated.len(), 1);
        assert_eq!(curated[0].code, "MONDO:1");
    }

    #[test]
    fn dedup_runs_before_sentinel_filter() {
        // The first record for an IRI wins even if it is later dropped.
        let mut first = make_record("HP:1", "http://x/1", "HP");
        first.system = Some(SYSTEM_SENTINEL.to_string());
        let second = make_record("HP:1", "http://x/1", "HP");
        assert!(curate(vec![first, second]).is_empty());
    }

    #[test]
    fn counts_match_curated_results() {
        let records = vec![
            make_record("MONDO:1", "http://x/1", "MONDO"),
            make_record("MONDO:2", "http://x/2", "MONDO"),
            make_record("MONDO:1", "http://x/1", "MONDO"),
            make_record("HP:1", "http://x/3", "HP"),
            make_record("X:1", "http://x/4", CURIE_SENTINEL),
        ];
        let curated = curate(records);
        let counts = count_per_ontology(&curated);
        assert_eq!(counts.get("MONDO"), Some(&2));
        assert_eq!(counts.get("HP"), Some(&1));
        assert_eq!(counts.values().sum::<usize>(), curated.len());
        assert!(!counts.contains_key(CURIE_SENTINEL));
    }
}
