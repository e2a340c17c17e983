//! Loading catalogs from JSON documents.
//!
//! A combined document looks like:
//!
//! ```json
//! {
//!   "dungeon": { "engulfed": ["you are engulfed", "you get expelled"] },
//!   "status":  { "hunger": { "you are hungry": "Hungry", "you are satiated": "Satiated" } }
//! }
//! ```
//!
//! Either top-level key may be omitted. Object order in the document is the
//! scan order of the resulting catalog.

use std::path::Path;

use serde_json::Value as Json;
use tracing::debug;

use crate::error::CatalogError;

use super::{CatalogConfig, DungeonCatalog, RuleCatalogs, StatusCatalog};

fn shape(reason: impl Into<String>) -> CatalogError {
    CatalogError::Shape {
        reason: reason.into(),
    }
}

fn json_type(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

impl DungeonCatalog {
    /// Builds a dungeon catalog from `{ event: [pattern, ...], ... }`.
    pub fn from_json_value(doc: &Json, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let table = doc
            .as_object()
            .ok_or_else(|| shape(format!("dungeon catalog must be an object, got {}", json_type(doc))))?;

        let mut builder = Self::builder().config(config.clone());
        for (event, patterns) in table {
            let list = patterns.as_array().ok_or_else(|| {
                shape(format!(
                    "dungeon event '{event}' must map to an array of patterns, got {}",
                    json_type(patterns)
                ))
            })?;
            for p in list {
                let source = p.as_str().ok_or_else(|| {
                    shape(format!("dungeon event '{event}' has a non-string pattern: {p}"))
                })?;
                builder = builder.pattern(event.as_str(), source);
            }
        }
        builder.build()
    }
}

impl StatusCatalog {
    /// Builds a status catalog from `{ event: { pattern: value, ... }, ... }`.
    pub fn from_json_value(doc: &Json, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let table = doc
            .as_object()
            .ok_or_else(|| shape(format!("status catalog must be an object, got {}", json_type(doc))))?;

        let mut builder = Self::builder().config(config.clone());
        for (event, rules) in table {
            let rules = rules.as_object().ok_or_else(|| {
                shape(format!(
                    "status event '{event}' must map to an object of pattern -> value, got {}",
                    json_type(rules)
                ))
            })?;
            for (pattern, value) in rules {
                builder = builder.rule(event.as_str(), pattern.as_str(), value.clone());
            }
        }
        builder.build()
    }
}

impl RuleCatalogs {
    /// Builds both catalogs from a combined document.
    pub fn from_json_value(doc: &Json, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let root = doc
            .as_object()
            .ok_or_else(|| shape(format!("catalog document must be an object, got {}", json_type(doc))))?;

        if let Some(unknown) = root.keys().find(|k| k.as_str() != "dungeon" && k.as_str() != "status") {
            return Err(shape(format!(
                "unknown catalog section '{unknown}' (expected 'dungeon' or 'status')"
            )));
        }

        let dungeon = match root.get("dungeon") {
            Some(section) => DungeonCatalog::from_json_value(section, config)?,
            None => DungeonCatalog::empty(),
        };
        let status = match root.get("status") {
            Some(section) => StatusCatalog::from_json_value(section, config)?,
            None => StatusCatalog::empty(),
        };

        let catalogs = Self::new(dungeon, status);
        debug!(
            dungeon_rules = catalogs.dungeon.len(),
            status_rules = catalogs.status.len(),
            fingerprint = %catalogs.fingerprint(),
            "loaded rule catalogs"
        );
        Ok(catalogs)
    }

    /// Parses and builds a combined document from a string.
    pub fn from_json_str(text: &str, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let doc: Json = serde_json::from_str(text).map_err(|e| CatalogError::Parse {
            message: e.to_string(),
        })?;
        Self::from_json_value(&doc, config)
    }

    /// Reads, parses and builds a combined document from a file.
    pub fn from_json_file(path: impl AsRef<Path>, config: &CatalogConfig) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text, config)
    }
}
