//! Schema violation types

use crate::kinds::{ComponentType, ElementType, NodeLevel};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    #[error("Unknown {level} type: {found}")]
    UnknownType { level: NodeLevel, found: String },

    #[error("Missing required {level} field `{field}`")]
    MissingField { level: NodeLevel, field: String },

    #[error("Field `{field}` must be {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("Invalid {element_type} properties: {message}")]
    InvalidProperties {
        element_type: ElementType,
        message: String,
    },

    #[error("Invalid property `{key}` on {node_type}: {message}")]
    InvalidProperty {
        node_type: &'static str,
        key: String,
        message: String,
    },

    #[error("{component_type} component requires a {required} element")]
    MissingElement {
        component_type: ComponentType,
        required: ElementType,
    },

    #[error("Duplicate {level} id: {id}")]
    DuplicateId { level: NodeLevel, id: String },

    #[error("Invalid {level} id: {id:?}")]
    InvalidId { level: NodeLevel, id: String },
}

/// A violation pinned to its location in the serialized tree
/// (`/sections/1/components/0`)
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub location: String,
    pub violation: SchemaViolation,
}

impl Violation {
    pub fn new(location: impl Into<String>, violation: SchemaViolation) -> Self {
        Self {
            location: location.into(),
            violation,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.location.is_empty() {
            write!(f, "/: {}", self.violation)
        } else {
            write!(f, "{}: {}", self.location, self.violation)
        }
    }
}
