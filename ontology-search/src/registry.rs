//! Source registry: turns requested identifiers into adapter instances.
//!
//! Dispatch is static. [`Source`] has one variant per registered service
//! and forwards every [`SourceAdapter`] call to the concrete adapter.

use serde_json::Value;

use crate::config::SearchConfig;
use crate::credentials::CredentialSource;
use crate::error::SearchError;
use crate::http::JsonFetcher;
use crate::source::SourceAdapter;
use crate::sources::{OlsCodeSource, OlsSource, UmlsSource};
use crate::types::{HarmonizedRecord, OntologyLookup, SourceId, SourcePage};

/// A constructed adapter for one registered source.
#[derive(Debug, Clone)]
pub enum Source {
    Ols(OlsSource),
    OlsCode(OlsCodeSource),
    Umls(UmlsSource),
}

impl Source {
    /// Construct a fresh adapter for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if the source needs a credential that
    /// `credentials` does not hold.
    pub fn create(
        id: SourceId,
        config: &SearchConfig,
        credentials: &impl CredentialSource,
    ) -> Result<Self, SearchError> {
        let base_url = config.endpoints.for_source(id);
        let max_page_size = config.max_page_size;
        Ok(match id {
            SourceId::Ols => Self::Ols(OlsSource::new(base_url, max_page_size)),
            SourceId::OlsCode => Self::OlsCode(OlsCodeSource::new(base_url, max_page_size)),
            SourceId::Umls => Self::Umls(UmlsSource::new(base_url, max_page_size, credentials)?),
        })
    }
}

/// Resolve source identifiers into adapters, in caller order.
///
/// Every name yields its own instance, so repeated names produce repeated
/// adapters.
///
/// # Errors
///
/// Returns [`SearchError::UnknownSource`] naming the first unregistered
/// identifier, or [`SearchError::Config`] if an adapter cannot be built.
pub fn resolve<S: AsRef<str>>(
    names: &[S],
    config: &SearchConfig,
    credentials: &impl CredentialSource,
) -> Result<Vec<Source>, SearchError> {
    names
        .iter()
        .map(|name| {
            let id: SourceId = name.as_ref().parse().inspect_err(|err| {
                tracing::error!(error = %err, "source resolution failed");
            })?;
            Source::create(id, config, credentials)
        })
        .collect()
}

impl SourceAdapter for Source {
    fn source_id(&self) -> SourceId {
        match self {
            Self::Ols(s) => s.source_id(),
            Self::OlsCode(s) => s.source_id(),
            Self::Umls(s) => s.source_id(),
        }
    }

    fn supports_ontology_filter(&self) -> bool {
        match self {
            Self::Ols(s) => s.supports_ontology_filter(),
            Self::OlsCode(s) => s.supports_ontology_filter(),
            Self::Umls(s) => s.supports_ontology_filter(),
        }
    }

    fn build_url(
        &self,
        keyword: &str,
        ontology_filter: &[String],
        start_index: usize,
        page_size: usize,
    ) -> String {
        match self {
            Self::Ols(s) => s.build_url(keyword, ontology_filter, start_index, page_size),
            Self::OlsCode(s) => s.build_url(keyword, ontology_filter, start_index, page_size),
            Self::Umls(s) => s.build_url(keyword, ontology_filter, start_index, page_size),
        }
    }

    async fn collect_page<F: JsonFetcher>(
        &self,
        fetcher: &F,
        url: &str,
        page_size: usize,
        start_index: usize,
    ) -> Result<SourcePage, SearchError> {
        match self {
            Self::Ols(s) => s.collect_page(fetcher, url, page_size, start_index).await,
            Self::OlsCode(s) => s.collect_page(fetcher, url, page_size, start_index).await,
            Self::Umls(s) => s.collect_page(fetcher, url, page_size, start_index).await,
        }
    }

    fn harmonize_record(&self, native: &Value, lookup: &OntologyLookup) -> HarmonizedRecord {
        match self {
            Self::Ols(s) => s.harmonize_record(native, lookup),
            Self::OlsCode(s) => s.harmonize_record(native, lookup),
            Self::Umls(s) => s.harmonize_record(native, lookup),
        }
    }

    fn clean(&self, records: Vec<HarmonizedRecord>) -> Vec<HarmonizedRecord> {
        match self {
            Self::Ols(s) => s.clean(records),
            Self::OlsCode(s) => s.clean(records),
            Self::Umls(s) => s.clean(records),
        }
    }
}
