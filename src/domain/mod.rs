//! Core types shared by every layer: section tags, field schemas, placed
//! instances and paths into their content.

pub mod component;
pub mod instance;
pub mod path;
pub mod schema;

pub use component::ComponentType;
pub use instance::{parse_content, ComponentInstance, PageDocument, Theme};
pub use path::{PathSegment, PropertyPath};
pub use schema::{ComponentSchema, FieldKind, FieldMap, FieldSchema};
