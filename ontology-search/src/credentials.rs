//! Credential lookup for sources that need an API key.
//!
//! Adapters ask a [`CredentialSource`] for named secrets while they are
//! being constructed. The values are never logged.

use std::collections::HashMap;

/// Environment variable holding the UMLS API key.
pub const UMLS_API_KEY: &str = "UMLS_API_KEY";

/// Somewhere credentials can be looked up by name.
pub trait CredentialSource: Send + Sync {
    /// The value stored under `name`, if present.
    fn credential(&self, name: &str) -> Option<String>;

    /// Like [`credential`](Self::credential) but treats blank values as absent.
    fn non_blank(&self, name: &str) -> Option<String> {
        self.credential(name).filter(|value| !value.trim().is_empty())
    }
}

/// Reads credentials from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn credential(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Fixed in-memory credentials.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    values: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential, replacing any previous value for `name`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CredentialSource for StaticCredentials {
    fn credential(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<T: CredentialSource + ?Sized> CredentialSource for &T {
    fn credential(&self, name: &str) -> Option<String> {
        (**self).credential(name)
    }
}
