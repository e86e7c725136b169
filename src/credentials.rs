//! Credential lookup for the host: config file first, then environment.

use ontology_search::credentials::UMLS_API_KEY;
use ontology_search::{CredentialSource, EnvCredentials};

use crate::config::CredentialsConfig;

/// Credentials from the config file, falling back to another source
/// (the process environment by default) for anything the file leaves unset.
#[derive(Clone)]
pub struct LayeredCredentials<F = EnvCredentials> {
    configured: CredentialsConfig,
    fallback: F,
}

impl LayeredCredentials {
    pub fn new(configured: CredentialsConfig) -> Self {
        Self::with_fallback(configured, EnvCredentials)
    }
}

impl<F: CredentialSource> LayeredCredentials<F> {
    pub fn with_fallback(configured: CredentialsConfig, fallback: F) -> Self {
        Self {
            configured,
            fallback,
        }
    }

    fn configured_value(&self, name: &str) -> Option<String> {
        match name {
            UMLS_API_KEY => self.configured.umls_api_key.clone(),
            _ => None,
        }
        .filter(|value| !value.trim().is_empty())
    }
}

impl<F: CredentialSource> CredentialSource for LayeredCredentials<F> {
    fn credential(&self, name: &str) -> Option<String> {
        self.configured_value(name)
            .or_else(|| self.fallback.credential(name))
    }
}

impl<F> std::fmt::Debug for LayeredCredentials<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredCredentials")
            .field("configured", &self.configured)
            .finish_non_exhaustive()
    }
}
