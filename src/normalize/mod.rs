//! Prop Normalizer
//!
//! Reshapes persisted section content into the exact props a renderer
//! expects. Dispatch goes through the tag table in [`rules`]; the output is a
//! pure function of `(component_type, raw)` and the registry defaults.

pub mod rules;
mod validator;

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::domain::{ComponentType, PathSegment, PropertyPath};
use crate::registry::SchemaRegistry;

pub use rules::{default_paths, required_props, rules_for, PropRule, Shape, Source};
pub use validator::{validate, ValidationReport};

/// Array keys scanned by the generic heuristic, in priority order
pub const GENERIC_ARRAY_KEYS: &[&str] = &[
    "items",
    "list",
    "steps",
    "benefits",
    "features",
    "modules",
    "programs",
    "faqs",
    "painPoints",
];

const GENERIC_TEXT_KEYS: &[&str] = &["title", "subtitle", "description"];

/// Table-driven normalizer over a schema registry
#[derive(Debug, Clone)]
pub struct Normalizer {
    registry: Arc<SchemaRegistry>,
}

impl Normalizer {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Normalize raw content for a persisted tag string.
    ///
    /// Non-object input is treated as `{}`. Unknown tags use the generic
    /// heuristic; catalog tags without a rule set pass their content through.
    pub fn normalize(&self, component_type: &str, raw: &Value) -> Value {
        let empty = Value::Object(Map::new());
        let raw = if raw.is_object() { raw } else { &empty };

        match ComponentType::from_name(component_type) {
            Some(tag) => match rules_for(tag) {
                Some(rules) => self.apply_rules(tag, rules, raw),
                None => raw.clone(),
            },
            None => generic(raw),
        }
    }

    /// Normalize, then check the result against the tag's required props
    pub fn normalize_and_validate(&self, component_type: &str, raw: &Value) -> (Value, ValidationReport) {
        let props = self.normalize(component_type, raw);
        let report = validate(component_type, &props);
        (props, report)
    }

    fn apply_rules(&self, tag: ComponentType, rules: &[PropRule], raw: &Value) -> Value {
        let mut out = Value::Object(Map::new());
        for rule in rules {
            if let Some(value) = self.resolve(tag, rule, raw) {
                write_path(&mut out, &PropertyPath::parse(rule.target), value);
            }
        }
        out
    }

    fn resolve(&self, tag: ComponentType, rule: &PropRule, raw: &Value) -> Option<Value> {
        rule.sources.iter().find_map(|source| {
            let candidate = match source {
                Source::Path(path) => PropertyPath::parse(path).get(raw).cloned(),
                Source::Default(path) => self.registry.default_value(tag, path).cloned(),
                Source::EmptyList => Some(Value::Array(Vec::new())),
                Source::Object(nested) => Some(self.apply_rules(tag, nested, raw)),
            };
            candidate.filter(|value| fits(rule.shape, value))
        })
    }
}

fn fits(shape: Shape, value: &Value) -> bool {
    match shape {
        Shape::Any => !value.is_null(),
        Shape::List => value.is_array(),
        Shape::Object => value.is_object(),
    }
}

/// Fallback for tags with no table entry
fn generic(raw: &Value) -> Value {
    let mut out = Map::new();

    for key in GENERIC_TEXT_KEYS {
        match raw.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(value) => {
                out.insert((*key).to_string(), value.clone());
            }
        }
    }

    for key in GENERIC_ARRAY_KEYS {
        if let Some(list @ Value::Array(_)) = raw.get(key) {
            out.insert((*key).to_string(), list.clone());
            if !out.contains_key("items") {
                out.insert("items".to_string(), list.clone());
            }
        }
    }

    Value::Object(out)
}

/// Write `value` at `path`, creating intermediate objects. Only object
/// segments are produced by the rule tables.
fn write_path(target: &mut Value, path: &PropertyPath, value: Value) {
    let mut segments: Vec<&str> = path
        .segments()
        .filter_map(|seg| match seg {
            PathSegment::Property(name) => Some(name.as_str()),
            PathSegment::Index(_) => None,
        })
        .collect();

    let Some(last) = segments.pop() else {
        return;
    };

    let mut current = target;
    for segment in segments {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Value::Object(obj) = current else {
            return;
        };
        current = obj
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(obj) = current {
        obj.insert(last.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(SchemaRegistry::builtin().unwrap()))
    }

    #[test]
    fn test_payroll_faq_aliases_nested_items() {
        let raw = json!({ "faq": { "items": [{ "question": "Q1", "answer": "A1" }] } });
        let props = normalizer().normalize("PayrollFAQSection", &raw);
        assert_eq!(props["faqs"], json!([{ "question": "Q1", "answer": "A1" }]));
    }

    #[test]
    fn test_normalize_and_validate_reports_empty_lists() {
        let (props, report) = normalizer().normalize_and_validate("PayrollFAQSection", &json!({}));
        assert_eq!(props["faqs"], json!([]));
        assert!(!report.is_valid);
        assert!(report.missing_required.contains(&"faqs".to_string()));

        let raw = json!({ "faq": { "items": [{ "question": "Q1", "answer": "A1" }] } });
        let (_, report) = normalizer().normalize_and_validate("PayrollFAQSection", &raw);
        assert!(report.is_valid);
    }

    #[test]
    fn test_wrapper_key_beats_flat_key() {
        let raw = json!({
            "title": "Flat",
            "workflow": { "title": "Nested", "steps": [{ "title": "One" }] },
            "steps": [{ "title": "Flat step" }]
        });
        let n = normalizer();
        let props = n.normalize("PayrollWorkflowSection", &raw);
        assert_eq!(props["title"], json!("Nested"));
        assert_eq!(props["steps"], json!([{ "title": "One" }]));
        assert_eq!(n.normalize("PayrollWorkflowSection", &props), props);
    }

    #[test]
    fn test_wrong_shape_falls_through() {
        let raw = json!({ "faq": { "items": "oops" }, "faqs": [{ "question": "Q" }] });
        let props = normalizer().normalize("PayrollFAQSection", &raw);
        assert_eq!(props["faqs"], json!([{ "question": "Q" }]));
    }

    #[test]
    fn test_defaults_come_from_registry() {
        let n = normalizer();
        let props = n.normalize("PayrollCTASection", &json!({}));
        assert_eq!(props["title"], json!("Ready to Get Started?"));
        assert_eq!(props["cta"]["buttonText"], json!("Get Started"));
        assert!(validate("PayrollCTASection", &props).is_valid);
    }

    #[test]
    fn test_cta_description_maps_to_subtitle() {
        let raw = json!({ "cta": { "title": "Talk to us", "description": "Any time" } });
        let props = normalizer().normalize("PayrollCTASection", &raw);
        assert_eq!(props["subtitle"], json!("Any time"));
        assert_eq!(props["cta"], raw["cta"]);
    }

    #[test]
    fn test_hr_hero_nests_under_data() {
        let raw = json!({ "hero": { "title": "People first" }, "bgColor": "#fff" });
        let props = normalizer().normalize("HRHeroSection", &raw);
        assert_eq!(props["data"]["hero"]["title"], json!("People first"));
        assert_eq!(props["data"]["hero"]["bgColor"], json!("#fff"));
    }

    #[test]
    fn test_training_programs_header_from_flat_keys() {
        let raw = json!({ "title": "Courses", "programs": [{ "title": "Payroll 101" }] });
        let props = normalizer().normalize("TrainingProgramsSection", &raw);
        assert_eq!(props["programsSection"]["title"], json!("Courses"));
        assert_eq!(props["trainingPrograms"]["programs"][0]["title"], json!("Payroll 101"));
    }

    #[test]
    fn test_unknown_tag_uses_generic_heuristic() {
        let raw = json!({
            "title": "Legacy",
            "subtitle": "",
            "steps": [1, 2],
            "benefits": [3],
            "banner": "dropped"
        });
        let props = normalizer().normalize("LegacyBannerSection", &raw);
        assert_eq!(
            props,
            json!({ "title": "Legacy", "steps": [1, 2], "items": [1, 2], "benefits": [3] })
        );
    }

    #[test]
    fn test_catalog_tag_without_rules_passes_through() {
        let raw = json!({ "title": "Hi", "imageUrl": "/hero.png" });
        assert_eq!(normalizer().normalize("HeroSection", &raw), raw);
    }

    #[test]
    fn test_non_object_input_is_empty() {
        let n = normalizer();
        assert_eq!(n.normalize("PayrollFAQSection", &json!("junk")), n.normalize("PayrollFAQSection", &json!({})));
        assert_eq!(n.normalize("HeroSection", &json!([1])), json!({}));
    }

    #[test]
    fn test_write_path_creates_parents() {
        let mut out = json!({ "data": "scalar" });
        write_path(&mut out, &PropertyPath::parse("data.hero.title"), json!("T"));
        assert_eq!(out, json!({ "data": { "hero": { "title": "T" } } }));
    }
}
