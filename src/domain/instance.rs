//! Placed sections and the page documents that hold them

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::component::ComponentType;

/// Colour scheme a section is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u8")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value of the `data-theme` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Theme {
    /// Read a stored theme value. Only `1` is light; anything other than
    /// `2` is logged and rendered dark so one bad record stays local.
    pub fn from_wire(raw: &Value) -> Self {
        match raw.as_u64() {
            Some(1) => Theme::Light,
            Some(2) => Theme::Dark,
            _ => {
                tracing::warn!(value = %raw, "Unknown theme value, rendering dark");
                Theme::Dark
            }
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Theme::from_wire(&raw))
    }
}

impl From<Theme> for u8 {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => 1,
            Theme::Dark => 2,
        }
    }
}

/// One placed occurrence of a section on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    pub id: Uuid,
    /// Persisted tag; may name a section this build does not know
    pub component_type: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub theme: Theme,
    /// Serialized JSON object, opaque until parsed
    #[serde(default)]
    pub content_json: String,
    #[serde(default)]
    pub order_index: usize,
}

fn default_visible() -> bool {
    true
}

impl ComponentInstance {
    pub fn new(component_type: impl Into<String>, content: &Value, order_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            component_type: component_type.into(),
            is_visible: true,
            theme: Theme::default(),
            content_json: content.to_string(),
            order_index,
        }
    }

    /// The closed tag, if this build knows it
    pub fn tag(&self) -> Option<ComponentType> {
        ComponentType::from_name(&self.component_type)
    }

    /// Parsed content. Unparseable or non-object content reads as `{}`.
    pub fn content(&self) -> Value {
        parse_content(&self.content_json)
    }
}

/// Parse serialized section content, degrading to an empty object
pub fn parse_content(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            tracing::warn!(
                kind = json_kind(&other),
                "Section content is not an object, using empty content"
            );
            Value::Object(Map::new())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse section content, using empty content");
            Value::Object(Map::new())
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A page as persisted by the storage layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub components: Vec<ComponentInstance>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_theme_wire_values() {
        assert_eq!(serde_json::to_value(Theme::Light).unwrap(), json!(1));
        assert_eq!(serde_json::to_value(Theme::Dark).unwrap(), json!(2));
        assert_eq!(serde_json::from_value::<Theme>(json!(2)).unwrap(), Theme::Dark);
        assert_eq!(serde_json::from_value::<Theme>(json!(1)).unwrap(), Theme::Light);
    }

    #[test]
    fn test_unknown_theme_value_degrades_to_dark() {
        let document: PageDocument = serde_json::from_value(json!({
            "name": "Home",
            "slug": "home",
            "components": [
                { "id": "5f0c7f0e-8a53-4d5b-9a3e-2f1b6e1c9d10", "componentType": "HeroSection",
                  "theme": 0, "contentJson": "{}", "orderIndex": 0 },
                { "id": "8b1d2e3f-4a5b-4c6d-8e7f-9a0b1c2d3e4f", "componentType": "CtaSection",
                  "theme": "light", "contentJson": "{}", "orderIndex": 1 },
                { "id": "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d", "componentType": "FAQSection",
                  "contentJson": "{}", "orderIndex": 2 }
            ]
        }))
        .unwrap();

        let themes: Vec<Theme> = document.components.iter().map(|c| c.theme).collect();
        assert_eq!(themes, vec![Theme::Dark, Theme::Dark, Theme::Light]);
    }

    #[test]
    fn test_instance_camel_case_record() {
        let record = json!({
            "id": "5f0c7f0e-8a53-4d5b-9a3e-2f1b6e1c9d10",
            "componentType": "PayrollFAQSection",
            "isVisible": false,
            "theme": 2,
            "contentJson": "{\"title\":\"FAQ\"}",
            "orderIndex": 3
        });
        let instance: ComponentInstance = serde_json::from_value(record).unwrap();

        assert_eq!(instance.tag(), Some(ComponentType::PayrollFAQSection));
        assert!(!instance.is_visible);
        assert_eq!(instance.theme, Theme::Dark);
        assert_eq!(instance.content(), json!({ "title": "FAQ" }));
        assert_eq!(instance.order_index, 3);
    }

    #[test]
    fn test_malformed_content_reads_as_empty_object() {
        assert_eq!(parse_content("{not json"), json!({}));
        assert_eq!(parse_content("[1, 2]"), json!({}));
        assert_eq!(parse_content("   "), json!({}));
        assert_eq!(parse_content("null"), json!({}));
    }

    #[test]
    fn test_unknown_tag_is_kept_verbatim() {
        let instance = ComponentInstance::new("LegacyBannerSection", &json!({}), 0);
        assert_eq!(instance.tag(), None);
        assert_eq!(instance.component_type, "LegacyBannerSection");
    }
}
