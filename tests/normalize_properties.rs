//! Property-based tests for prop normalization.
//!
//! - Fallback: normalizing `{}` yields every rule that has a fallback
//! - Validator: `validate(normalize({}))` reports exactly the props left for the user
//! - Idempotence: normalize(normalize(x)) == normalize(x)
//! - Priority: wrapper keys beat flat keys

use pagesmith::domain::{ComponentType, PropertyPath};
use pagesmith::normalize::{required_props, rules_for, validate, Normalizer, PropRule};
use pagesmith::registry::SchemaRegistry;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn normalizer() -> Normalizer {
    Normalizer::new(Arc::new(SchemaRegistry::builtin().unwrap()))
}

fn rule_for(rules: &[PropRule], target: &str) -> Option<PropRule> {
    rules.iter().copied().find(|r| r.target == target)
}

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

const KEYS: &[&str] = &[
    "title",
    "subtitle",
    "description",
    "items",
    "steps",
    "faqs",
    "faq",
    "cta",
    "hero",
    "data",
    "modules",
    "process",
    "workflow",
    "benefits",
    "features",
    "painPoints",
    "programs",
    "programsSection",
    "heroContent",
    "ctaButton",
    "badge",
];

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (0i64..100).prop_map(Value::from),
        "[a-zA-Z ]{0,12}".prop_map(Value::from),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..3).prop_map(Value::Array),
            prop::collection::vec((prop::sample::select(KEYS), inner), 0..4).prop_map(|entries| {
                Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<Map<_, _>>())
            }),
        ]
    })
}

fn raw_strategy() -> impl Strategy<Value = Value> {
    prop::collection::vec((prop::sample::select(KEYS), value_strategy()), 0..6)
        .prop_map(|entries| Value::Object(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()))
}

fn tag_strategy() -> impl Strategy<Value = ComponentType> {
    prop::sample::select(ComponentType::ALL.to_vec())
}

// =============================================================================
// FALLBACKS AND VALIDATION
// =============================================================================

#[test]
fn empty_content_yields_every_fallback() {
    let n = normalizer();
    for tag in ComponentType::ALL {
        let Some(rules) = rules_for(*tag) else { continue };
        let props = n.normalize(tag.as_str(), &json!({}));
        for rule in rules {
            let value = PropertyPath::parse(rule.target).get(&props);
            assert!(value.is_some(), "{}: '{}' missing after normalizing {{}}", tag, rule.target);
            if rule.has_fallback() {
                assert_ne!(value, Some(&Value::Null), "{}: '{}'", tag, rule.target);
            }
        }
    }
}

#[test]
fn validator_reports_exactly_props_without_fallback() {
    let n = normalizer();
    for tag in ComponentType::ALL {
        let rules = rules_for(*tag).unwrap_or(&[]);
        let props = n.normalize(tag.as_str(), &json!({}));
        let report = validate(tag.as_str(), &props);

        let expected: Vec<String> = required_props(*tag)
            .iter()
            .filter(|path| !rule_for(rules, path).map_or(false, |r| r.has_fallback()))
            .map(|path| path.to_string())
            .collect();

        assert_eq!(report.missing_required, expected, "{}", tag);
        assert_eq!(report.is_valid, expected.is_empty());
    }
}

#[test]
fn payroll_faq_example() {
    let raw = json!({ "faq": { "items": [{ "question": "Q1", "answer": "A1" }] } });
    let props = normalizer().normalize("PayrollFAQSection", &raw);
    assert_eq!(props["faqs"], json!([{ "question": "Q1", "answer": "A1" }]));
    assert!(validate("PayrollFAQSection", &props).is_valid);
}

proptest! {
    /// Normalizing already-normalized props changes nothing
    #[test]
    fn normalization_is_idempotent(tag in tag_strategy(), raw in raw_strategy()) {
        let n = normalizer();
        let once = n.normalize(tag.as_str(), &raw);
        let twice = n.normalize(tag.as_str(), &once);
        prop_assert_eq!(once, twice);
    }

    /// Same input, same output
    #[test]
    fn normalization_is_deterministic(tag in tag_strategy(), raw in raw_strategy()) {
        let n = normalizer();
        prop_assert_eq!(n.normalize(tag.as_str(), &raw), n.normalize(tag.as_str(), &raw));
    }

    /// The wrapper key wins over the flat key for the same logical field
    #[test]
    fn wrapper_beats_flat_key(
        nested in "[a-z]{1,10}",
        flat in "[A-Z]{1,10}",
        questions in prop::collection::vec("[a-z]{1,8}", 0..4),
    ) {
        let faqs: Vec<Value> = questions.iter().map(|q| json!({ "question": q })).collect();
        let raw = json!({
            "faq": { "title": nested.clone(), "items": faqs.clone() },
            "title": flat,
            "faqs": [{ "question": "flat" }]
        });
        let props = normalizer().normalize("PayrollFAQSection", &raw);
        prop_assert_eq!(&props["title"], &json!(nested));
        prop_assert_eq!(&props["faqs"], &Value::Array(faqs));
    }

    /// Unknown tags never fail and always alias the first array as `items`
    #[test]
    fn generic_heuristic_aliases_items(raw in raw_strategy()) {
        let props = normalizer().normalize("UnknownLegacySection", &raw);
        prop_assert!(props.is_object());
        if let Some(first) = ["items", "list", "steps", "benefits", "features", "modules", "programs", "faqs", "painPoints"]
            .iter()
            .find_map(|k| raw.get(*k).filter(|v| v.is_array()))
        {
            prop_assert_eq!(&props["items"], first);
        }
    }
}
