use serde_json::Value;
use std::collections::BTreeMap;

use super::{CatalogEntry, RegistryError};
use crate::domain::ComponentType;
use crate::forms::resolver::parse_component_schema;

/// Catalog shipped with the crate
pub const BUILTIN_CATALOG: &str = include_str!("../../catalog/components.json");

pub(super) fn parse_catalog(catalog: &Value) -> Result<BTreeMap<ComponentType, CatalogEntry>, RegistryError> {
    let root = catalog.as_object().ok_or_else(|| RegistryError::InvalidEntry {
        entry: "<root>".to_string(),
        reason: "catalog must be an object keyed by component type".to_string(),
    })?;

    let mut entries = BTreeMap::new();
    for (name, raw) in root {
        let tag = ComponentType::from_name(name).ok_or_else(|| RegistryError::UnknownComponent(name.clone()))?;
        entries.insert(tag, parse_entry(name, raw)?);
    }
    Ok(entries)
}

fn parse_entry(name: &str, raw: &Value) -> Result<CatalogEntry, RegistryError> {
    let obj = raw.as_object().ok_or_else(|| RegistryError::InvalidEntry {
        entry: name.to_string(),
        reason: "expected an object".to_string(),
    })?;

    let display_name = obj.get("displayName").and_then(|v| v.as_str()).unwrap_or(name);
    let category = obj.get("category").and_then(|v| v.as_str()).unwrap_or("general");

    let schema = match obj.get("schema") {
        Some(schema) => parse_component_schema(display_name, category, schema).map_err(|e| match e {
            RegistryError::InvalidSchema { path, reason } => RegistryError::InvalidSchema {
                path: format!("{}.{}", name, path),
                reason,
            },
            other => other,
        })?,
        None => {
            return Err(RegistryError::InvalidEntry {
                entry: name.to_string(),
                reason: "missing 'schema'".to_string(),
            })
        }
    };

    let default_data = match obj.get("defaultData") {
        Some(data @ Value::Object(_)) => data.clone(),
        None => Value::Object(Default::default()),
        Some(_) => {
            return Err(RegistryError::InvalidEntry {
                entry: name.to_string(),
                reason: "'defaultData' must be an object".to_string(),
            })
        }
    };

    Ok(CatalogEntry { schema, default_data })
}
