//! The abstract form tree handed to a UI layer

use serde::Serialize;
use serde_json::Value;

use crate::domain::{FieldKind, PropertyPath};

/// How the field list of a form was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormMode {
    /// Fields come from the registry schema
    Schema,
    /// No schema: every field was inferred from the data
    Inferred,
}

/// A generated form for one section's content
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormView {
    pub component_type: String,
    pub mode: FormMode,
    pub nodes: Vec<FormNode>,
}

/// One node of the form tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum FormNode {
    /// A single scalar control
    Field(FieldControl),
    /// A nested object editor
    #[serde(rename_all = "camelCase")]
    Group {
        path: PropertyPath,
        label: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        children: Vec<FormNode>,
    },
    /// A reorderable list editor
    List(ListNode),
    /// Placeholder for data that does not fit its field
    Invalid {
        path: PropertyPath,
        label: String,
        reason: String,
    },
}

impl FormNode {
    pub fn path(&self) -> &PropertyPath {
        match self {
            FormNode::Field(control) => &control.path,
            FormNode::Group { path, .. } => path,
            FormNode::List(list) => &list.path,
            FormNode::Invalid { path, .. } => path,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FormNode::Field(control) => &control.label,
            FormNode::Group { label, .. } => label,
            FormNode::List(list) => &list.label,
            FormNode::Invalid { label, .. } => label,
        }
    }

    /// Depth-first walk over this node and its descendants
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a FormNode)) {
        visit(self);
        match self {
            FormNode::Group { children, .. } => {
                for child in children {
                    child.walk(visit);
                }
            }
            FormNode::List(list) => {
                for item in &list.items {
                    item.node.walk(visit);
                }
            }
            FormNode::Field(_) | FormNode::Invalid { .. } => {}
        }
    }
}

/// Scalar editor control
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldControl {
    pub path: PropertyPath,
    pub label: String,
    pub kind: FieldKind,
    /// Current value; `null` renders as an empty control
    pub value: Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// List editor with one block per element
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNode {
    pub path: PropertyPath,
    pub label: String,
    /// Kind of the declared item schema, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_kind: Option<FieldKind>,
    pub items: Vec<ListItem>,
    pub can_add: bool,
    pub can_remove: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub index: usize,
    pub node: FormNode,
}

impl FormView {
    /// Every node in document order
    pub fn all_nodes(&self) -> Vec<&FormNode> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.walk(&mut |n| out.push(n));
        }
        out
    }

    /// True if any node addresses `path` or something beneath it
    pub fn references(&self, path: &PropertyPath) -> bool {
        let prefix: Vec<_> = path.segments().collect();
        self.all_nodes().iter().any(|node| {
            let segments: Vec<_> = node.path().segments().collect();
            segments.len() >= prefix.len() && segments[..prefix.len()] == prefix[..]
        })
    }

    pub fn find(&self, path: &PropertyPath) -> Option<&FormNode> {
        self.all_nodes().into_iter().find(|node| node.path() == path)
    }
}
