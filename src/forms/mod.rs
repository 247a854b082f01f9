//! Schema-driven section forms
//!
//! - `resolver`: decides the editor kind of each field (schema or inference)
//! - `generator`: walks schema + data into a [`FormView`] tree
//! - `edit`: applies [`FormEdit`]s to a content snapshot

pub mod edit;
pub mod generator;
pub mod node;
pub mod resolver;

pub use edit::{item_template, move_item, EditError, FormEdit, FormEditor};
pub use generator::FormGenerator;
pub use node::{FieldControl, FormMode, FormNode, FormView, ListItem, ListNode};

/// Settings that influence form generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Strings longer than this many characters are edited as long text
    pub long_text_threshold: usize,
    /// Also render inferred controls for data keys the schema does not declare
    pub render_unknown_keys: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            long_text_threshold: 100,
            render_unknown_keys: false,
        }
    }
}
