use serde::Serialize;
use serde_json::Value;

use crate::domain::{ComponentType, PropertyPath};

use super::rules::required_props;

/// Outcome of checking normalized props against a tag's required list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub missing_required: Vec<String>,
}

/// Report required props that are absent, null, `""` or `[]`. Never fails;
/// unknown tags have no requirements.
pub fn validate(component_type: &str, props: &Value) -> ValidationReport {
    let required = ComponentType::from_name(component_type)
        .map(required_props)
        .unwrap_or(&[]);

    let missing_required: Vec<String> = required
        .iter()
        .filter(|path| is_missing(PropertyPath::parse(path).get(props)))
        .map(|path| path.to_string())
        .collect();

    ValidationReport {
        is_valid: missing_required.is_empty(),
        missing_required,
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}
