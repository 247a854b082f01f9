//! Catalog coverage audit
//!
//! Cross-checks every section tag's schema, default content and normalizer
//! table so drift between them shows up before a page does.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{ComponentType, FieldKind, FieldMap};
use crate::normalize::{default_paths, required_props, rules_for};
use crate::registry::SchemaRegistry;

/// How a tag's content reaches its renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NormalizerCoverage {
    /// Dedicated rule table
    Rules,
    /// Content is passed through unchanged
    PassThrough,
}

/// Findings for one tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagAudit {
    pub component_type: ComponentType,
    pub has_entry: bool,
    /// Schema fields with no value in `defaultData`
    pub missing_defaults: Vec<String>,
    /// `defaultData` keys the schema does not declare
    pub undeclared_defaults: Vec<String>,
    pub visible_arrays: Vec<String>,
    pub hidden_arrays: Vec<String>,
    pub normalizer: NormalizerCoverage,
    /// Normalizer `Default` sources that do not resolve in `defaultData`
    pub unresolved_defaults: Vec<String>,
    /// Required props no rule produces
    pub unproduced_required: Vec<String>,
}

impl TagAudit {
    pub fn is_clean(&self) -> bool {
        self.has_entry
            && self.missing_defaults.is_empty()
            && self.undeclared_defaults.is_empty()
            && self.unresolved_defaults.is_empty()
            && self.unproduced_required.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    pub tags: Vec<TagAudit>,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.tags.iter().all(TagAudit::is_clean)
    }

    pub fn problems(&self) -> impl Iterator<Item = &TagAudit> {
        self.tags.iter().filter(|t| !t.is_clean())
    }

    pub fn hidden_array_count(&self) -> usize {
        self.tags.iter().map(|t| t.hidden_arrays.len()).sum()
    }
}

pub fn audit(registry: &SchemaRegistry) -> AuditReport {
    AuditReport {
        tags: ComponentType::ALL.iter().map(|tag| audit_tag(registry, *tag)).collect(),
    }
}

fn audit_tag(registry: &SchemaRegistry, tag: ComponentType) -> TagAudit {
    let rules = rules_for(tag);
    let normalizer = if rules.is_some() {
        NormalizerCoverage::Rules
    } else {
        NormalizerCoverage::PassThrough
    };

    let unproduced_required = required_props(tag)
        .iter()
        .filter(|path| !rules.unwrap_or(&[]).iter().any(|rule| rule.target == **path))
        .map(|path| path.to_string())
        .collect();

    let unresolved_defaults = rules
        .map(default_paths)
        .unwrap_or_default()
        .into_iter()
        .filter(|path| registry.default_value(tag, path).is_none())
        .map(str::to_string)
        .collect();

    let mut report = TagAudit {
        component_type: tag,
        has_entry: false,
        missing_defaults: Vec::new(),
        undeclared_defaults: Vec::new(),
        visible_arrays: Vec::new(),
        hidden_arrays: Vec::new(),
        normalizer,
        unresolved_defaults,
        unproduced_required,
    };

    let Some(entry) = registry.entry(tag) else {
        return report;
    };
    report.has_entry = true;

    let fields = &entry.schema.fields;
    let defaults = entry.default_data.as_object();

    report.missing_defaults = fields
        .keys()
        .filter(|key| defaults.map_or(true, |d| d.get(*key).map_or(true, Value::is_null)))
        .map(str::to_string)
        .collect();
    report.undeclared_defaults = defaults
        .into_iter()
        .flat_map(|d| d.keys())
        .filter(|key| !fields.contains_key(key))
        .cloned()
        .collect();

    collect_arrays(fields, "", &mut report);
    report
}

fn collect_arrays(fields: &FieldMap, prefix: &str, report: &mut TagAudit) {
    for (key, field) in fields.iter() {
        let path = if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        };
        match field.kind {
            FieldKind::Array if field.hidden => report.hidden_arrays.push(path),
            FieldKind::Array => report.visible_arrays.push(path),
            FieldKind::Object if !field.hidden => collect_arrays(&field.fields, &path, report),
            _ => {}
        }
    }
}
