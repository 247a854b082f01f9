//! Form generation
//!
//! Walks a component schema alongside the section's current content and
//! produces one node per visible field. Hidden fields and undeclared keys are
//! skipped; data that does not fit its field becomes an `Invalid` node so the
//! rest of the form stays usable.

use serde_json::{Map, Value};

use crate::domain::instance::json_kind;
use crate::domain::{ComponentSchema, FieldKind, FieldMap, FieldSchema, PropertyPath};

use super::node::{FieldControl, FormMode, FormNode, FormView, ListItem, ListNode};
use super::resolver::{humanize_label, infer_schema};
use super::FormOptions;

/// Schema Form Generator
#[derive(Debug, Clone, Default)]
pub struct FormGenerator {
    options: FormOptions,
}

impl FormGenerator {
    pub fn new(options: FormOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Generate the form for a section. Without a schema every key of `data`
    /// is inferred.
    pub fn render(&self, component_type: &str, schema: Option<&ComponentSchema>, data: &Value) -> FormView {
        let root = PropertyPath::root();
        let mode = if schema.is_some() { FormMode::Schema } else { FormMode::Inferred };
        let empty = Map::new();
        let obj = match data {
            Value::Object(obj) => Some(obj),
            Value::Null => Some(&empty),
            _ => None,
        };

        let nodes = match (schema, obj) {
            (Some(schema), Some(obj)) => self.render_object(&root, &schema.fields, obj),
            (None, Some(obj)) => self.render_inferred_object(&root, obj),
            (_, None) => vec![FormNode::Invalid {
                path: root,
                label: component_type.to_string(),
                reason: format!("expected an object, found {}", json_kind(data)),
            }],
        };

        FormView {
            component_type: component_type.to_string(),
            mode,
            nodes,
        }
    }

    fn render_object(&self, path: &PropertyPath, fields: &FieldMap, obj: &Map<String, Value>) -> Vec<FormNode> {
        let mut nodes: Vec<FormNode> = fields
            .visible()
            .map(|(key, field)| {
                let value = obj.get(key).unwrap_or(&Value::Null);
                self.render_field(&path.push_property(key), field, value)
            })
            .collect();

        if self.options.render_unknown_keys {
            nodes.extend(
                obj.iter()
                    .filter(|(key, _)| !fields.contains_key(key))
                    .map(|(key, value)| self.render_inferred(&path.push_property(key), key, value)),
            );
        }
        nodes
    }

    fn render_inferred_object(&self, path: &PropertyPath, obj: &Map<String, Value>) -> Vec<FormNode> {
        obj.iter()
            .map(|(key, value)| self.render_inferred(&path.push_property(key), key, value))
            .collect()
    }

    fn render_inferred(&self, path: &PropertyPath, key: &str, value: &Value) -> FormNode {
        let schema = infer_schema(key, value, self.options.long_text_threshold);
        self.render_field(path, &schema, value)
    }

    /// Render one field against its schema
    pub fn render_field(&self, path: &PropertyPath, field: &FieldSchema, value: &Value) -> FormNode {
        match field.kind {
            FieldKind::Object => self.render_group(path, field, value),
            FieldKind::Array => self.render_list(path, field, value),
            kind => match value {
                Value::Object(_) | Value::Array(_) => invalid(path, field, kind.as_str(), value),
                scalar => FormNode::Field(FieldControl {
                    path: path.clone(),
                    label: field.label.clone(),
                    kind,
                    value: scalar.clone(),
                    required: field.required,
                    placeholder: field.placeholder.clone(),
                    description: field.description.clone(),
                    options: field.options.clone(),
                    media_type: field.media_type.clone(),
                }),
            },
        }
    }

    fn render_group(&self, path: &PropertyPath, field: &FieldSchema, value: &Value) -> FormNode {
        let empty = Map::new();
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Null => &empty,
            other => return invalid(path, field, "object", other),
        };

        // An object schema without properties gets its keys inferred
        let children = if field.fields.is_empty() {
            self.render_inferred_object(path, obj)
        } else {
            self.render_object(path, &field.fields, obj)
        };

        FormNode::Group {
            path: path.clone(),
            label: field.label.clone(),
            description: field.description.clone(),
            children,
        }
    }

    fn render_list(&self, path: &PropertyPath, field: &FieldSchema, value: &Value) -> FormNode {
        let elements: &[Value] = match value {
            Value::Array(items) => items.as_slice(),
            Value::Null => &[],
            other => return invalid(path, field, "array", other),
        };

        let items = elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let item_path = path.push_index(index);
                let node = match field.item.as_deref() {
                    Some(item_schema) => {
                        let mut item_schema = item_schema.clone();
                        item_schema.label = item_label(&field.label, index);
                        self.render_field(&item_path, &item_schema, element)
                    }
                    None => {
                        let mut inferred = infer_schema(
                            path.key().unwrap_or("item"),
                            element,
                            self.options.long_text_threshold,
                        );
                        inferred.label = item_label(&field.label, index);
                        self.render_field(&item_path, &inferred, element)
                    }
                };
                ListItem { index, node }
            })
            .collect::<Vec<_>>();

        let len = items.len();
        FormNode::List(ListNode {
            path: path.clone(),
            label: field.label.clone(),
            item_kind: field.item.as_ref().map(|item| item.kind),
            items,
            can_add: field.max_items.map_or(true, |max| len < max),
            can_remove: len > field.min_items.unwrap_or(0),
            min_items: field.min_items,
            max_items: field.max_items,
        })
    }
}

fn item_label(list_label: &str, index: usize) -> String {
    let base = if list_label.is_empty() { humanize_label("item") } else { list_label.to_string() };
    format!("{} #{}", base, index + 1)
}

fn invalid(path: &PropertyPath, field: &FieldSchema, expected: &str, found: &Value) -> FormNode {
    FormNode::Invalid {
        path: path.clone(),
        label: field.label.clone(),
        reason: format!("expected {} data, found {}", expected, json_kind(found)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn about_hero_schema() -> ComponentSchema {
        let stat: FieldMap = vec![
            ("value", FieldSchema::new(FieldKind::String, "Value")),
            ("label", FieldSchema::new(FieldKind::String, "Label")),
        ]
        .into_iter()
        .collect();

        ComponentSchema {
            display_name: "About Hero".to_string(),
            category: "about".to_string(),
            fields: vec![
                ("title", FieldSchema::new(FieldKind::String, "Title").required()),
                ("description", FieldSchema::new(FieldKind::LongText, "Description")),
                (
                    "stats",
                    FieldSchema::array("Statistics", FieldSchema::object("Stat", stat))
                        .hidden()
                        .with_bounds(None, Some(6)),
                ),
            ]
            .into_iter()
            .collect(),
        }
    }

    #[test]
    fn test_hidden_field_has_no_control() {
        let data = json!({
            "title": "About us",
            "stats": [{ "value": "500+", "label": "Clients" }]
        });
        let form = FormGenerator::default().render("AboutHeroSection", Some(&about_hero_schema()), &data);

        assert_eq!(form.mode, FormMode::Schema);
        assert!(!form.references(&PropertyPath::parse("stats")));
        assert!(form.all_nodes().iter().all(|n| n.label() != "Statistics"));
        assert_eq!(form.nodes.len(), 2);
    }

    #[test]
    fn test_missing_values_render_empty_controls() {
        let form = FormGenerator::default().render("AboutHeroSection", Some(&about_hero_schema()), &json!({}));
        match form.find(&PropertyPath::parse("title")) {
            Some(FormNode::Field(control)) => {
                assert_eq!(control.value, Value::Null);
                assert!(control.required);
            }
            other => panic!("expected a field control, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_keys_are_not_rendered_by_default() {
        let data = json!({ "title": "x", "legacyBanner": "old" });
        let schema = about_hero_schema();

        let form = FormGenerator::default().render("AboutHeroSection", Some(&schema), &data);
        assert!(form.find(&PropertyPath::parse("legacyBanner")).is_none());

        let generator = FormGenerator::new(FormOptions {
            render_unknown_keys: true,
            ..FormOptions::default()
        });
        let form = generator.render("AboutHeroSection", Some(&schema), &data);
        assert!(form.find(&PropertyPath::parse("legacyBanner")).is_some());
    }

    #[test]
    fn test_inferred_mode_without_schema() {
        let data = json!({
            "title": "Hello",
            "backgroundImage": "/img/bg.jpg",
            "steps": [{ "title": "One" }, { "title": "Two" }],
            "cta": { "text": "Go", "link": "https://example.com" }
        });
        let form = FormGenerator::default().render("MysterySection", None, &data);

        assert_eq!(form.mode, FormMode::Inferred);
        match form.find(&PropertyPath::parse("backgroundImage")) {
            Some(FormNode::Field(c)) => assert_eq!(c.kind, FieldKind::Media),
            other => panic!("unexpected {:?}", other),
        }
        match form.find(&PropertyPath::parse("steps")) {
            Some(FormNode::List(list)) => {
                assert_eq!(list.items.len(), 2);
                assert!(list.can_add && list.can_remove);
            }
            other => panic!("unexpected {:?}", other),
        }
        match form.find(&PropertyPath::parse("cta.link")) {
            Some(FormNode::Field(c)) => assert_eq!(c.kind, FieldKind::Url),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_data_is_scoped_to_the_field() {
        let schema = ComponentSchema {
            display_name: "Test".to_string(),
            category: "test".to_string(),
            fields: vec![
                ("title", FieldSchema::new(FieldKind::String, "Title")),
                ("steps", FieldSchema::array("Steps", FieldSchema::new(FieldKind::String, "Step"))),
                ("cta", FieldSchema::object("CTA", FieldMap::new())),
            ]
            .into_iter()
            .collect(),
        };
        let data = json!({ "title": { "nested": true }, "steps": "not a list", "cta": { "text": "ok" } });
        let form = FormGenerator::default().render("Test", Some(&schema), &data);

        assert!(matches!(form.nodes[0], FormNode::Invalid { .. }));
        assert!(matches!(form.nodes[1], FormNode::Invalid { .. }));
        assert!(matches!(form.nodes[2], FormNode::Group { .. }));
        assert!(form.find(&PropertyPath::parse("cta.text")).is_some());
    }

    #[test]
    fn test_non_object_root_is_invalid() {
        let form = FormGenerator::default().render("HeroSection", None, &json!([1, 2]));
        assert_eq!(form.nodes.len(), 1);
        match &form.nodes[0] {
            FormNode::Invalid { reason, .. } => assert!(reason.contains("array")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_list_bounds_drive_add_remove() {
        let field = FieldSchema::array("Steps", FieldSchema::new(FieldKind::String, "Step"))
            .with_bounds(Some(1), Some(2));
        let generator = FormGenerator::default();

        match generator.render_field(&PropertyPath::parse("steps"), &field, &json!(["a", "b"])) {
            FormNode::List(list) => {
                assert!(!list.can_add);
                assert!(list.can_remove);
                assert_eq!(list.items[1].node.path().to_string(), "steps[1]");
                assert_eq!(list.items[1].node.label(), "Steps #2");
            }
            other => panic!("unexpected {:?}", other),
        }
        match generator.render_field(&PropertyPath::parse("steps"), &field, &json!(["a"])) {
            FormNode::List(list) => {
                assert!(list.can_add);
                assert!(!list.can_remove);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
