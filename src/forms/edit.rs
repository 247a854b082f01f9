//! The form update contract
//!
//! Every edit takes the current content snapshot by value and returns the
//! next one with exactly one path changed. Subtrees off the edited path are
//! moved through untouched, so hidden fields and keys unknown to the schema
//! survive every edit. Replacing a whole object or list puts its hidden
//! descendants back from the previous value.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::instance::json_kind;
use crate::domain::{ComponentSchema, FieldKind, FieldSchema, PathSegment, PropertyPath};

/// A single user edit emitted by a form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEdit {
    /// Replace the value at a path, creating missing parent objects
    Set { path: PropertyPath, value: Value },
    /// Append a new element built from the list's item template
    AddItem { path: PropertyPath },
    /// Delete an element; later elements shift down
    RemoveItem { path: PropertyPath, index: usize },
    /// Move an element from one position to another
    MoveItem { path: PropertyPath, from: usize, to: usize },
}

impl FormEdit {
    pub fn set(path: impl Into<PropertyPath>, value: Value) -> Self {
        FormEdit::Set { path: path.into(), value }
    }

    pub fn path(&self) -> &PropertyPath {
        match self {
            FormEdit::Set { path, .. }
            | FormEdit::AddItem { path }
            | FormEdit::RemoveItem { path, .. }
            | FormEdit::MoveItem { path, .. } => path,
        }
    }
}

/// Errors from applying a form edit
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EditError {
    /// A segment of the path runs through a value of the wrong shape
    #[error("Path conflict at '{path}': expected {expected}, found {found}")]
    PathConflict {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Array index past the end
    #[error("Index {index} out of range for '{path}' (length {len})")]
    IndexOutOfRange { path: String, index: usize, len: usize },

    /// Adding would exceed maxItems
    #[error("'{path}' allows at most {max} items")]
    TooManyItems { path: String, max: usize },

    /// Removing would go below minItems
    #[error("'{path}' requires at least {min} items")]
    TooFewItems { path: String, min: usize },

    /// The path addresses a field that is not user-editable
    #[error("'{path}' is a hidden field")]
    HiddenField { path: String },

    /// The edit needs a path but got the root
    #[error("Edit requires a non-empty field path")]
    EmptyPath,
}

/// Applies edits against an optional component schema
#[derive(Debug, Clone, Copy, Default)]
pub struct FormEditor<'a> {
    schema: Option<&'a ComponentSchema>,
}

impl<'a> FormEditor<'a> {
    pub fn new(schema: Option<&'a ComponentSchema>) -> Self {
        Self { schema }
    }

    /// Apply one edit to `data`, returning the next snapshot
    pub fn apply(&self, data: Value, edit: &FormEdit) -> Result<Value, EditError> {
        let path = edit.path();
        if path.is_root() {
            return Err(EditError::EmptyPath);
        }
        let field = self.lookup(path)?;

        let mut data = match data {
            Value::Object(_) => data,
            _ => Value::Object(Map::new()),
        };

        if let (FormEdit::AddItem { .. } | FormEdit::RemoveItem { .. } | FormEdit::MoveItem { .. }, Some(field)) =
            (edit, field)
        {
            if field.kind != FieldKind::Array {
                return Err(EditError::PathConflict {
                    path: path.to_string(),
                    expected: "array",
                    found: field.kind.as_str(),
                });
            }
        }

        match edit {
            FormEdit::Set { value, .. } => {
                let slot = slot_mut(&mut data, path, true)?;
                let previous = std::mem::replace(slot, value.clone());
                if let Some(field) = field {
                    carry_hidden(field, &previous, slot);
                }
            }
            FormEdit::AddItem { .. } => {
                let list = list_mut(&mut data, path, true)?;
                if let Some(max) = field.and_then(|f| f.max_items) {
                    if list.len() >= max {
                        return Err(EditError::TooManyItems { path: path.to_string(), max });
                    }
                }
                let template = match field.and_then(|f| f.item.as_deref()) {
                    Some(item) => item_template(item),
                    None => list.first().map(template_from_sample).unwrap_or_else(|| Value::String(String::new())),
                };
                list.push(template);
            }
            FormEdit::RemoveItem { index, .. } => {
                let list = list_mut(&mut data, path, false)?;
                check_index(path, *index, list.len())?;
                if let Some(min) = field.and_then(|f| f.min_items) {
                    if list.len() <= min {
                        return Err(EditError::TooFewItems { path: path.to_string(), min });
                    }
                }
                list.remove(*index);
            }
            FormEdit::MoveItem { from, to, .. } => {
                let list = list_mut(&mut data, path, false)?;
                check_index(path, *from, list.len())?;
                check_index(path, *to, list.len())?;
                move_item(list, *from, *to);
            }
        }

        Ok(data)
    }

    /// Schema for the edited path, rejecting paths through hidden fields
    fn lookup(&self, path: &PropertyPath) -> Result<Option<&'a FieldSchema>, EditError> {
        let Some(schema) = self.schema else {
            return Ok(None);
        };

        let mut current: Option<&'a FieldSchema> = None;
        for (depth, segment) in path.segments().enumerate() {
            let next = match (segment, current) {
                (PathSegment::Property(name), None) if depth == 0 => schema.fields.get(name),
                (PathSegment::Property(name), Some(field)) if field.kind == FieldKind::Object => {
                    field.fields.get(name)
                }
                (PathSegment::Index(_), Some(field)) if field.kind == FieldKind::Array => field.item.as_deref(),
                (PathSegment::Index(index), Some(field)) if field.kind == FieldKind::Object => {
                    field.fields.get(&index.to_string())
                }
                _ => None,
            };
            match next {
                Some(field) if field.hidden => {
                    return Err(EditError::HiddenField { path: path.to_string() });
                }
                Some(field) => current = Some(field),
                // Outside the schema: plain inferred data
                None => return Ok(None),
            }
        }
        Ok(current)
    }
}

/// Restore hidden descendants of `field` from `previous` into `next`.
/// List elements are matched by position.
fn carry_hidden(field: &FieldSchema, previous: &Value, next: &mut Value) {
    match field.kind {
        FieldKind::Object => {
            let (Some(old), Some(new)) = (previous.as_object(), next.as_object_mut()) else {
                return;
            };
            for (key, child) in field.fields.iter() {
                let Some(old_value) = old.get(key) else {
                    continue;
                };
                if child.hidden {
                    new.insert(key.to_string(), old_value.clone());
                } else if let Some(new_value) = new.get_mut(key) {
                    carry_hidden(child, old_value, new_value);
                }
            }
        }
        FieldKind::Array => {
            let (Some(item), Some(old), Some(new)) = (field.item.as_deref(), previous.as_array(), next.as_array_mut())
            else {
                return;
            };
            for (old_value, new_value) in old.iter().zip(new.iter_mut()) {
                carry_hidden(item, old_value, new_value);
            }
        }
        _ => {}
    }
}

/// Move an element, shifting the ones in between. Indices must be in range.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = list.remove(from);
    list.insert(to, item);
}

/// Fresh value for a new list element
pub fn item_template(schema: &FieldSchema) -> Value {
    match schema.kind {
        FieldKind::String | FieldKind::LongText | FieldKind::Media | FieldKind::Url => Value::String(String::new()),
        FieldKind::Number => Value::from(0),
        FieldKind::Boolean => Value::Bool(false),
        FieldKind::Enum => Value::String(schema.options.first().cloned().unwrap_or_default()),
        FieldKind::Array => Value::Array(Vec::new()),
        FieldKind::Object => Value::Object(
            schema
                .fields
                .iter()
                .map(|(key, field)| (key.to_string(), item_template(field)))
                .collect(),
        ),
    }
}

/// Template shaped like an existing element, with scalars cleared
fn template_from_sample(sample: &Value) -> Value {
    match sample {
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, value)| (key.clone(), template_from_sample(value)))
                .collect(),
        ),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::String(_) => Value::String(String::new()),
        Value::Number(_) => Value::from(0),
        Value::Bool(_) => Value::Bool(false),
        Value::Null => Value::Null,
    }
}

fn check_index(path: &PropertyPath, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange { path: path.to_string(), index, len })
    }
}

/// Walk to the slot at `path`, creating missing parent objects when `create`
fn slot_mut<'v>(data: &'v mut Value, path: &PropertyPath, create: bool) -> Result<&'v mut Value, EditError> {
    let mut walked = PropertyPath::root();
    let mut current = data;

    for segment in path.segments() {
        match segment {
            PathSegment::Property(name) => {
                if create && current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let found = json_kind(current);
                let obj = current.as_object_mut().ok_or_else(|| EditError::PathConflict {
                    path: walked.to_string(),
                    expected: "object",
                    found,
                })?;
                walked = walked.push_property(name);
                current = obj.entry(name.clone()).or_insert(Value::Null);
            }
            PathSegment::Index(index) => match current {
                // All-digit keys of an object, e.g. `years.2024`
                Value::Object(obj) => {
                    let name = index.to_string();
                    walked = walked.push_property(&name);
                    current = obj.entry(name).or_insert(Value::Null);
                }
                other => {
                    let found = json_kind(other);
                    let list = other.as_array_mut().ok_or_else(|| EditError::PathConflict {
                        path: walked.to_string(),
                        expected: "array",
                        found,
                    })?;
                    check_index(&walked, *index, list.len())?;
                    walked = walked.push_index(*index);
                    current = &mut list[*index];
                }
            },
        }
    }
    Ok(current)
}

/// The list at `path`; a missing or null list is created when `create`
fn list_mut<'v>(data: &'v mut Value, path: &PropertyPath, create: bool) -> Result<&'v mut Vec<Value>, EditError> {
    let slot = slot_mut(data, path, create)?;
    if create && slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    let found = json_kind(slot);
    slot.as_array_mut().ok_or_else(|| EditError::PathConflict {
        path: path.to_string(),
        expected: "array",
        found,
    })
}
