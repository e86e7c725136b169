//! Configuration file for the search-dragon host layer.

use std::fmt;
use std::path::{Path, PathBuf};

use ontology_search::SearchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{DragonError, Result};

/// Top-level configuration, loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragonConfig {
    /// Source endpoints, timeouts and fan-out.
    pub search: SearchConfig,
    /// Where the ontology lookup table lives.
    pub lookup: LookupConfig,
    /// Request values used when the caller leaves them out.
    pub defaults: RequestDefaults,
    /// Credentials stored in the file. Environment variables take over when unset.
    pub credentials: CredentialsConfig,
}

/// Ontology lookup table location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// CSV file with `curie` and `system` columns. `None` means no table;
    /// every record's system is then left empty.
    pub path: Option<PathBuf>,
}

/// Defaults for request fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    /// Sources queried when the caller names none.
    pub sources: Vec<String>,
    /// Rows requested from each source.
    pub page_size: usize,
    /// Row offset of the first page.
    pub start_index: usize,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            sources: vec!["ols".to_owned()],
            page_size: 50,
            start_index: 0,
        }
    }
}

/// Credentials kept in the config file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// UMLS API key. Falls back to `UMLS_API_KEY` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub umls_api_key: Option<String>,
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "umls_api_key",
                &self.umls_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl DragonConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DragonError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DragonError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `path` if given, else the default path if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file cannot be loaded, or if
    /// the default file exists but is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        let default_path = default_config_path();
        if default_path.exists() {
            tracing::debug!(path = %default_path.display(), "loading default config");
            Self::from_file(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// Returns [`DragonError::Search`] for invalid search settings and
    /// [`DragonError::Config`] for invalid request defaults.
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.defaults.page_size == 0 {
            return Err(DragonError::Config(
                "defaults.page_size must be greater than 0".into(),
            ));
        }
        if self.defaults.sources.is_empty() {
            return Err(DragonError::Config(
                "defaults.sources must name at least one source".into(),
            ));
        }
        Ok(())
    }
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/search-dragon/` by default. Override with
/// the `SEARCH_DRAGON_CONFIG_DIR` environment variable.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("SEARCH_DRAGON_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("search-dragon"))
        .unwrap_or_else(|| PathBuf::from("/tmp/search-dragon-config"))
}

/// Returns the default config file path: `<config_dir>/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}
