//! Schema Registry
//!
//! Maps each section tag to its field schema and default content. The
//! registry is pure data: lookups have no side effects, and an unknown tag is
//! answered with `None` / an empty object so callers fall back to inference.

mod loader;

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::domain::{ComponentSchema, ComponentType, PropertyPath};

pub use loader::BUILTIN_CATALOG;

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog is not valid JSON
    #[error("Catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog root or an entry has the wrong shape
    #[error("Invalid catalog entry '{entry}': {reason}")]
    InvalidEntry { entry: String, reason: String },

    /// A field schema could not be parsed
    #[error("Invalid schema at {path}: {reason}")]
    InvalidSchema { path: String, reason: String },

    /// Catalog names a tag this build does not know
    #[error("Unknown component type in catalog: {0}")]
    UnknownComponent(String),
}

/// Schema and defaults for one tag
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub schema: ComponentSchema,
    pub default_data: Value,
}

/// Tag -> catalog entry lookup
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: BTreeMap<ComponentType, CatalogEntry>,
}

impl SchemaRegistry {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Load an override catalog, or the built-in one when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self, RegistryError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Self::builtin(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry = Self::from_json_str(&content)?;
        tracing::info!(path = %path.display(), entries = registry.len(), "Loaded component catalog");
        Ok(registry)
    }

    pub fn from_json_str(content: &str) -> Result<Self, RegistryError> {
        let catalog: Value = serde_json::from_str(content)?;
        let entries = loader::parse_catalog(&catalog)?;
        tracing::debug!(entries = entries.len(), "Parsed component catalog");
        Ok(Self { entries })
    }

    /// Build a registry from already-parsed entries
    pub fn from_entries(entries: impl IntoIterator<Item = (ComponentType, CatalogEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Schema for a persisted tag string; `None` means "render with whatever data exists"
    pub fn get_schema(&self, component_type: &str) -> Option<&ComponentSchema> {
        ComponentType::from_name(component_type).and_then(|tag| self.schema(tag))
    }

    pub fn schema(&self, tag: ComponentType) -> Option<&ComponentSchema> {
        self.entries.get(&tag).map(|e| &e.schema)
    }

    /// Default content for a persisted tag string; `{}` when unknown
    pub fn get_default_data(&self, component_type: &str) -> Value {
        ComponentType::from_name(component_type)
            .and_then(|tag| self.entries.get(&tag))
            .map(|e| e.default_data.clone())
            .unwrap_or_else(|| Value::Object(Map::new()))
    }

    /// One value inside a tag's default content, addressed by a dotted path
    pub fn default_value(&self, tag: ComponentType, path: &str) -> Option<&Value> {
        let entry = self.entries.get(&tag)?;
        PropertyPath::parse(path).get(&entry.default_data)
    }

    pub fn entry(&self, tag: ComponentType) -> Option<&CatalogEntry> {
        self.entries.get(&tag)
    }

    /// Tags with a catalog entry, in tag order
    pub fn tags(&self) -> impl Iterator<Item = ComponentType> + '_ {
        self.entries.keys().copied()
    }

    pub fn contains(&self, tag: ComponentType) -> bool {
        self.entries.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
