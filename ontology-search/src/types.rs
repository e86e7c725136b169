//! Core types for ontology records, source identification, and lookups.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::SearchError;

/// Marker written into `ontology_prefix` when a record's prefix is missing
/// or cannot be parsed. Records carrying it are dropped during curation.
pub const CURIE_SENTINEL: &str = "ERR:CURIE";

/// Marker written into `system` when a record's prefix has no entry in the
/// [`OntologyLookup`]. Records carrying it are dropped during curation.
pub const SYSTEM_SENTINEL: &str = "ERR:SYSTEM";

/// A concept record in the canonical shape shared by every source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Ontology-qualified identifier, e.g. `MONDO:0005015`.
    pub code: String,
    /// Resolved coding-system name, or empty.
    pub system: String,
    /// Concept IRI. When non-empty it is the cross-source dedup key.
    pub code_iri: String,
    /// Preferred label.
    pub display: String,
    /// Description lines. Never null.
    pub description: Vec<String>,
    /// Uppercase ontology namespace.
    pub ontology_prefix: String,
}

/// A record after source-specific harmonisation but before curation.
///
/// Fields stay optional here because sources omit them freely; the curator
/// assigns typed defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HarmonizedRecord {
    pub code: Option<String>,
    pub system: Option<String>,
    pub code_iri: Option<String>,
    pub display: Option<String>,
    /// Raw description as supplied: absent, null, a bare string, or an array.
    pub description: Option<Value>,
    pub ontology_prefix: Option<String>,
}

impl HarmonizedRecord {
    /// The dedup key, if this record has a non-empty IRI.
    pub fn dedup_key(&self) -> Option<&str> {
        self.code_iri.as_deref().filter(|iri| !iri.is_empty())
    }
}

/// What a caller asks for: one logical page across a set of sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text keyword or code.
    pub keyword: String,
    /// Ontology prefixes, honoured by sources that filter server-side.
    #[serde(default)]
    pub ontology_filter: Vec<String>,
    /// Registry identifiers, queried in this order. Repeats are kept.
    pub sources: Vec<String>,
    /// Rows requested from each source.
    pub page_size: usize,
    /// Row offset of the page, shared by every source.
    #[serde(default)]
    pub start_index: usize,
}

impl SearchRequest {
    /// A first-page request with no ontology filter.
    pub fn new(keyword: impl Into<String>, sources: &[&str], page_size: usize) -> Self {
        Self {
            keyword: keyword.into(),
            ontology_filter: Vec::new(),
            sources: sources.iter().map(|s| (*s).to_owned()).collect(),
            page_size,
            start_index: 0,
        }
    }

    pub fn with_ontologies(mut self, ontologies: &[&str]) -> Self {
        self.ontology_filter = ontologies.iter().map(|o| (*o).to_owned()).collect();
        self
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = start_index;
        self
    }
}

/// One page of native records fetched from a single source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePage {
    /// Native JSON records, in the order the source returned them.
    pub records: Vec<Value>,
    /// Whether the source reports further pages after this one.
    pub more_available: bool,
}

impl SourcePage {
    /// A page with no records and nothing further to fetch.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Ontology lookup services that can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    /// EBI Ontology Lookup Service keyword search.
    Ols,
    /// EBI Ontology Lookup Service v2 entity search, suited to code queries.
    #[serde(rename = "ols2")]
    OlsCode,
    /// NLM Unified Medical Language System terminology service.
    Umls,
}

impl SourceId {
    /// The registry identifier callers use to request this source.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Ols => "ols",
            Self::OlsCode => "ols2",
            Self::Umls => "umls",
        }
    }

    /// All registered sources.
    pub fn all() -> &'static [SourceId] {
        &[Self::Ols, Self::OlsCode, Self::Umls]
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SourceId {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|source| source.id() == s)
            .ok_or_else(|| SearchError::UnknownSource(format!("'{s}' is not recognized")))
    }
}

/// Read-only mapping from curie prefix to coding-system name.
///
/// Cloning is cheap; all clones share one map, so the table can be handed
/// to concurrent source tasks without synchronisation.
#[derive(Debug, Clone, Default)]
pub struct OntologyLookup {
    systems: Arc<HashMap<String, String>>,
}

impl OntologyLookup {
    /// Wrap a prefix → system map.
    pub fn new(systems: HashMap<String, String>) -> Self {
        Self {
            systems: Arc::new(systems),
        }
    }

    /// An empty table. Every `system` resolves to the empty string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The system registered for `prefix`, if any.
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.systems.get(prefix).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl FromIterator<(String, String)> for OntologyLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
