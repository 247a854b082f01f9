//! Declarative descriptions of a section's editable content

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Editor kind of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// Single-line text
    String,
    /// Multi-line text
    LongText,
    Number,
    Boolean,
    /// One of a fixed list of options
    Enum,
    /// Image/video reference
    Media,
    /// Link target
    Url,
    /// Nested object with its own fields
    Object,
    /// Reorderable list of objects or scalars
    Array,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::LongText => "longText",
            FieldKind::Number => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::Enum => "enum",
            FieldKind::Media => "media",
            FieldKind::Url => "url",
            FieldKind::Object => "object",
            FieldKind::Array => "array",
        }
    }

    pub fn is_scalar(&self) -> bool {
        !matches!(self, FieldKind::Object | FieldKind::Array)
    }
}

/// Ordered field key -> schema mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap(Vec<(String, FieldSchema)>);

impl FieldMap {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace a field, keeping first-insertion order
    pub fn insert(&mut self, key: impl Into<String>, schema: FieldSchema) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = schema,
            None => self.0.push((key, schema)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.0.iter().map(|(k, s)| (k.as_str(), s))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    /// Fields that get an editor control
    pub fn visible(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.iter().filter(|(_, s)| !s.hidden)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldSchema)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, FieldSchema)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (key, schema) in iter {
            map.insert(key, schema);
        }
        map
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, schema) in &self.0 {
            map.serialize_entry(key, schema)?;
        }
        map.end()
    }
}

/// Schema of one editable field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    pub kind: FieldKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub required: bool,
    /// Part of the data contract but never rendered as a control
    pub hidden: bool,
    /// Choices for `Enum` fields
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// "image" or "video" for `Media` fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Sub-fields for `Object` fields
    #[serde(skip_serializing_if = "FieldMap::is_empty")]
    pub fields: FieldMap,
    /// Element schema for `Array` fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<Box<FieldSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

impl FieldSchema {
    pub fn new(kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            placeholder: None,
            description: None,
            required: false,
            hidden: false,
            options: Vec::new(),
            media_type: None,
            fields: FieldMap::new(),
            item: None,
            min_items: None,
            max_items: None,
        }
    }

    pub fn object(label: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            fields,
            ..Self::new(FieldKind::Object, label)
        }
    }

    pub fn array(label: impl Into<String>, item: FieldSchema) -> Self {
        Self {
            item: Some(Box::new(item)),
            ..Self::new(FieldKind::Array, label)
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bounds(mut self, min_items: Option<usize>, max_items: Option<usize>) -> Self {
        self.min_items = min_items;
        self.max_items = max_items;
        self
    }
}

/// Editable shape of one component type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    pub display_name: String,
    pub category: String,
    pub fields: FieldMap,
}
