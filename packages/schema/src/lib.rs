//! # Pagecraft Schema
//!
//! Typed shape of a page document: Template → Section → Component → Element,
//! the closed type vocabularies for each level, per-node editability, and the
//! validation predicates shared by hydration and the editor.

pub mod error;
pub mod geometry;
pub mod kinds;
pub mod model;
pub mod path;
pub mod properties;
pub mod tool;
pub mod validate;

pub use error::{SchemaViolation, Violation};
pub use geometry::Rect;
pub use kinds::{
    ComponentType, EditAction, EditableType, ElementType, NodeLevel, SectionType, UnknownKind,
};
pub use model::{Colors, Component, Element, Node, NodeRef, Section, Spacing, Template};
pub use path::{InvalidPath, NodePath, ParentPath};
pub use properties::{ElementProps, Link, PropertyMap, SocialLink};
pub use tool::ToolId;
pub use validate::{validate, validate_subtree, validate_tree};
