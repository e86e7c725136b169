//! Ontology lookup table loader.
//!
//! The table is a CSV file with a header row naming at least a `curie`
//! column (the ontology prefix, e.g. `MONDO`) and a `system` column (the
//! coding-system name reported on matching records). Extra columns are
//! ignored.

use std::collections::HashMap;
use std::path::Path;

use ontology_search::OntologyLookup;

use crate::error::{DragonError, Result};

/// Load the lookup table at `path`.
///
/// Any failure (missing file, unreadable row, missing column) is logged and
/// yields an empty table, so searches still run with blank `system` fields.
pub fn load_ontology_lookup(path: &Path) -> OntologyLookup {
    match read_lookup_csv(path) {
        Ok(systems) => {
            tracing::info!(path = %path.display(), count = systems.len(), "loaded ontology lookup");
            OntologyLookup::new(systems)
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to load ontology lookup, continuing with an empty table");
            OntologyLookup::empty()
        }
    }
}

/// Load the lookup at `path` if one is configured, else an empty table.
pub fn load_optional(path: Option<&Path>) -> OntologyLookup {
    match path {
        Some(path) => load_ontology_lookup(path),
        None => {
            tracing::debug!("no ontology lookup configured");
            OntologyLookup::empty()
        }
    }
}

fn read_lookup_csv(path: &Path) -> Result<HashMap<String, String>> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let headers = reader.headers().map_err(csv_error)?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| DragonError::Lookup(format!("missing `{name}` column")))
    };
    let curie_idx = column("curie")?;
    let system_idx = column("system")?;

    let mut systems = HashMap::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(|e| DragonError::Lookup(format!("row {}: {e}", idx + 1)))?;
        let curie = row.get(curie_idx).map(str::trim).unwrap_or_default();
        if curie.is_empty() {
            continue;
        }
        let system = row.get(system_idx).map(str::trim).unwrap_or_default();
        // Later rows win, as with any keyed table.
        systems.insert(curie.to_uppercase(), system.to_owned());
    }
    Ok(systems)
}

fn csv_error(e: csv::Error) -> DragonError {
    if e.is_io_error() {
        match e.into_kind() {
            csv::ErrorKind::Io(io) => DragonError::Io(io),
            other => DragonError::Lookup(format!("{other:?}")),
        }
    } else {
        DragonError::Lookup(e.to_string())
    }
}
