//! Page Composition Store
//!
//! Owns the ordered list of placed sections. Every mutation leaves
//! `order_index` as a contiguous `0..len` sequence matching list order.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{ComponentInstance, PageDocument, PropertyPath, Theme};
use crate::forms::{move_item, EditError, FormEdit, FormEditor};
use crate::registry::SchemaRegistry;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    /// No instance with this id
    #[error("Component instance not found: {0}")]
    NotFound(Uuid),

    /// Position past the end of the page
    #[error("Index {index} out of range (page has {len} components)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The form edit was rejected
    #[error(transparent)]
    Edit(#[from] EditError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone)]
pub struct PageStore {
    registry: Arc<SchemaRegistry>,
    name: String,
    slug: String,
    components: Vec<ComponentInstance>,
}

impl PageStore {
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            name: String::new(),
            slug: String::new(),
            components: Vec::new(),
        }
    }

    /// Load persisted instances, ordered by their stored `order_index`
    pub fn load(registry: Arc<SchemaRegistry>, mut components: Vec<ComponentInstance>) -> Self {
        components.sort_by_key(|c| c.order_index);
        let mut store = Self::new(registry);
        store.components = components;
        store.renumber();
        store
    }

    pub fn from_document(registry: Arc<SchemaRegistry>, document: PageDocument) -> Self {
        let mut store = Self::load(registry, document.components);
        store.name = document.name;
        store.slug = document.slug;
        store
    }

    pub fn to_document(&self) -> PageDocument {
        PageDocument {
            name: self.name.clone(),
            slug: self.slug.clone(),
            components: self.components.clone(),
        }
    }

    pub fn components(&self) -> &[ComponentInstance] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&ComponentInstance> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Append a section seeded with its registry defaults
    pub fn add(&mut self, component_type: &str) -> Uuid {
        let content = self.registry.get_default_data(component_type);
        let instance = ComponentInstance::new(component_type, &content, self.components.len());
        let id = instance.id;
        self.components.push(instance);
        debug!(%id, component_type, "Added component");
        id
    }

    pub fn remove(&mut self, id: Uuid) -> StoreResult<ComponentInstance> {
        let index = self.position(id)?;
        let removed = self.components.remove(index);
        self.renumber();
        debug!(%id, "Removed component");
        Ok(removed)
    }

    /// Clone an instance under a new id at the end of the page
    pub fn duplicate(&mut self, id: Uuid) -> StoreResult<Uuid> {
        let source = &self.components[self.position(id)?];
        let copy = ComponentInstance {
            id: Uuid::new_v4(),
            order_index: self.components.len(),
            ..source.clone()
        };
        let new_id = copy.id;
        self.components.push(copy);
        debug!(%id, %new_id, "Duplicated component");
        Ok(new_id)
    }

    pub fn move_component(&mut self, from: usize, to: usize) -> StoreResult<()> {
        let len = self.components.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        move_item(&mut self.components, from, to);
        self.renumber();
        debug!(from, to, "Moved component");
        Ok(())
    }

    /// Set one field of an instance's content
    pub fn update_field(&mut self, id: Uuid, path: &str, value: Value) -> StoreResult<()> {
        self.apply_edit(
            id,
            &FormEdit::Set {
                path: PropertyPath::parse(path),
                value,
            },
        )
    }

    /// Apply a form edit to an instance's content and re-serialize it
    pub fn apply_edit(&mut self, id: Uuid, edit: &FormEdit) -> StoreResult<()> {
        let index = self.position(id)?;
        let instance = &self.components[index];
        let schema = self.registry.get_schema(&instance.component_type);
        let content = FormEditor::new(schema).apply(instance.content(), edit)?;

        self.components[index].content_json = content.to_string();
        debug!(%id, path = %edit.path(), "Updated component content");
        Ok(())
    }

    pub fn set_visible(&mut self, id: Uuid, visible: bool) -> StoreResult<()> {
        let index = self.position(id)?;
        self.components[index].is_visible = visible;
        Ok(())
    }

    pub fn set_theme(&mut self, id: Uuid, theme: Theme) -> StoreResult<()> {
        let index = self.position(id)?;
        self.components[index].theme = theme;
        Ok(())
    }

    fn position(&self, id: Uuid) -> StoreResult<usize> {
        self.components
            .iter()
            .position(|c| c.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn renumber(&mut self) {
        for (index, component) in self.components.iter_mut().enumerate() {
            component.order_index = index;
        }
    }
}
