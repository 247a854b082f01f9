//! Field-type resolution
//!
//! Two modes: schema-driven (a catalog entry names the editor kind) and
//! inferred (no schema, classify the value by its JSON shape). Schema kinds
//! always win; inference only applies to keys the schema does not describe.

use serde_json::Value;

use crate::domain::{ComponentSchema, FieldKind, FieldMap, FieldSchema};
use crate::registry::RegistryError;

use super::FormOptions;

/// Keys that name a media reference when matched exactly
const MEDIA_KEYS: &[&str] = &[
    "image", "video", "icon", "logo", "thumbnail", "avatar", "banner", "poster",
];

/// Key suffixes that name a media reference
const MEDIA_SUFFIXES: &[&str] = &["image", "video", "img", "photo"];

const URL_PREFIXES: &[&str] = &["http://", "https://", "mailto:", "www."];

// ============================================================================
// Kind Resolution
// ============================================================================

/// Editor kind for a field: the schema's kind, or the inferred kind of `value`
pub fn resolve_field_kind(
    key: &str,
    schema: Option<&FieldSchema>,
    value: &Value,
    options: &FormOptions,
) -> FieldKind {
    match schema {
        Some(schema) => schema.kind,
        None => infer_kind(key, value, options.long_text_threshold),
    }
}

/// Classify a raw value by shape
pub fn infer_kind(key: &str, value: &Value, long_text_threshold: usize) -> FieldKind {
    match value {
        Value::Bool(_) => FieldKind::Boolean,
        Value::Number(_) => FieldKind::Number,
        Value::Array(_) => FieldKind::Array,
        Value::Object(_) => FieldKind::Object,
        Value::Null => FieldKind::String,
        Value::String(s) => {
            if s.chars().count() > long_text_threshold || s.contains('\n') {
                FieldKind::LongText
            } else if is_media_key(key) {
                FieldKind::Media
            } else if looks_like_url(s) {
                FieldKind::Url
            } else {
                FieldKind::String
            }
        }
    }
}

/// Build a schema for a value that has none. Arrays get no item schema so
/// each element is inferred on its own.
pub fn infer_schema(key: &str, value: &Value, long_text_threshold: usize) -> FieldSchema {
    let kind = infer_kind(key, value, long_text_threshold);
    let mut schema = FieldSchema::new(kind, humanize_label(key));
    if let Value::Object(map) = value {
        schema.fields = map
            .iter()
            .map(|(k, v)| (k.clone(), infer_schema(k, v, long_text_threshold)))
            .collect();
    }
    if kind == FieldKind::Media {
        schema.media_type = Some(media_type_for_key(key).to_string());
    }
    schema
}

fn is_media_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    MEDIA_KEYS.contains(&key.as_str()) || MEDIA_SUFFIXES.iter().any(|s| key.ends_with(s))
}

fn media_type_for_key(key: &str) -> &'static str {
    if key.to_ascii_lowercase().ends_with("video") {
        "video"
    } else {
        "image"
    }
}

fn looks_like_url(s: &str) -> bool {
    let lower = s.trim_start().to_ascii_lowercase();
    URL_PREFIXES.iter().any(|p| lower.starts_with(p))
}

/// "backgroundVideo" -> "Background Video", "Professional_Badge" -> "Professional Badge"
pub fn humanize_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            if !label.ends_with(' ') && !label.is_empty() {
                label.push(' ');
            }
            prev_lower = false;
            continue;
        }
        if ch.is_uppercase() && prev_lower {
            label.push(' ');
        }
        if label.is_empty() || label.ends_with(' ') {
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
    }
    label.trim_end().to_string()
}

// ============================================================================
// Catalog Schema Parsing
// ============================================================================

/// Parse one catalog entry's `schema` object into the component's field map
pub fn parse_component_schema(
    display_name: &str,
    category: &str,
    schema: &Value,
) -> Result<ComponentSchema, RegistryError> {
    let obj = schema.as_object().ok_or_else(|| RegistryError::InvalidSchema {
        path: "schema".to_string(),
        reason: "expected an object".to_string(),
    })?;

    let fields = match obj.get("properties") {
        Some(props) => parse_properties("schema", props, obj.get("required"))?,
        None => FieldMap::new(),
    };

    Ok(ComponentSchema {
        display_name: display_name.to_string(),
        category: category.to_string(),
        fields,
    })
}

fn parse_properties(
    path: &str,
    props: &Value,
    required_list: Option<&Value>,
) -> Result<FieldMap, RegistryError> {
    let props = props.as_object().ok_or_else(|| RegistryError::InvalidSchema {
        path: format!("{}.properties", path),
        reason: "expected an object".to_string(),
    })?;

    let required: Vec<&str> = required_list
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let mut fields = FieldMap::new();
    for (key, prop) in props {
        let child_path = format!("{}.{}", path, key);
        let mut field = parse_field_schema(&child_path, key, prop)?;
        if required.contains(&key.as_str()) {
            field.required = true;
        }
        fields.insert(key.clone(), field);
    }
    Ok(fields)
}

/// Parse a single JSON-Schema-like field description
pub fn parse_field_schema(path: &str, key: &str, value: &Value) -> Result<FieldSchema, RegistryError> {
    let obj = value.as_object().ok_or_else(|| RegistryError::InvalidSchema {
        path: path.to_string(),
        reason: "expected an object".to_string(),
    })?;

    let str_prop = |name: &str| obj.get(name).and_then(|v| v.as_str()).map(String::from);

    let options = parse_options(obj.get("options").or_else(|| obj.get("enum")));
    let kind = resolve_declared_kind(path, obj, !options.is_empty())?;

    let mut field = FieldSchema::new(kind, str_prop("label").unwrap_or_else(|| humanize_label(key)));
    field.placeholder = str_prop("placeholder");
    field.description = str_prop("description");
    field.required = obj.get("required").and_then(|v| v.as_bool()).unwrap_or(false);
    field.hidden = obj.get("hidden").and_then(|v| v.as_bool()).unwrap_or(false);
    field.options = options;
    field.media_type = str_prop("mediaType");
    if kind == FieldKind::Media && field.media_type.is_none() {
        field.media_type = Some(media_type_for_key(key).to_string());
    }
    field.min_items = obj.get("minItems").and_then(|v| v.as_u64()).map(|n| n as usize);
    field.max_items = obj.get("maxItems").and_then(|v| v.as_u64()).map(|n| n as usize);

    match kind {
        FieldKind::Object => {
            if let Some(props) = obj.get("properties") {
                field.fields = parse_properties(path, props, obj.get("required"))?;
            }
        }
        FieldKind::Array => {
            field.item = match obj.get("items") {
                Some(items) => Some(Box::new(parse_field_schema(&format!("{}[]", path), key, items)?)),
                // Tag lists are lists of plain strings even when `items` is omitted
                None if str_prop("formField").as_deref() == Some("tagList") => {
                    Some(Box::new(FieldSchema::new(FieldKind::String, "Tag")))
                }
                None => None,
            };
            if let (Some(min), Some(max)) = (field.min_items, field.max_items) {
                if min > max {
                    return Err(RegistryError::InvalidSchema {
                        path: path.to_string(),
                        reason: format!("minItems {} exceeds maxItems {}", min, max),
                    });
                }
            }
        }
        _ => {}
    }

    Ok(field)
}

fn resolve_declared_kind(
    path: &str,
    obj: &serde_json::Map<String, Value>,
    has_options: bool,
) -> Result<FieldKind, RegistryError> {
    if let Some(form_field) = obj.get("formField").and_then(|v| v.as_str()) {
        let kind = match form_field {
            "text" => Some(FieldKind::String),
            "textarea" => Some(FieldKind::LongText),
            "media" => Some(FieldKind::Media),
            "select" | "enum" => Some(FieldKind::Enum),
            "url" => Some(FieldKind::Url),
            "tagList" | "array" => Some(FieldKind::Array),
            "checkbox" | "toggle" => Some(FieldKind::Boolean),
            "number" => Some(FieldKind::Number),
            "object" => Some(FieldKind::Object),
            _ => None,
        };
        match kind {
            Some(kind) => return Ok(kind),
            None => tracing::warn!(path, form_field, "Unknown formField, falling back to type"),
        }
    }

    match obj.get("type").and_then(|v| v.as_str()) {
        Some("string") if has_options => Ok(FieldKind::Enum),
        Some("string") => Ok(FieldKind::String),
        Some("number") | Some("integer") => Ok(FieldKind::Number),
        Some("boolean") => Ok(FieldKind::Boolean),
        Some("object") => Ok(FieldKind::Object),
        Some("array") => Ok(FieldKind::Array),
        Some(other) => Err(RegistryError::InvalidSchema {
            path: path.to_string(),
            reason: format!("unsupported type '{}'", other),
        }),
        None if obj.contains_key("properties") => Ok(FieldKind::Object),
        None if obj.contains_key("items") => Ok(FieldKind::Array),
        None if has_options => Ok(FieldKind::Enum),
        None => Ok(FieldKind::String),
    }
}

fn parse_options(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    Value::Object(o) => o
                        .get("value")
                        .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                        .unwrap_or_default(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
