//! Error types for the editor

use crate::mutations::MutationError;
use pagecraft_catalog::CatalogError;
use pagecraft_hydration::HydrationError;
use pagecraft_schema::{EditAction, EditableType, NodePath, SchemaViolation};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Id `{id}` is ambiguous: found at {}", join_paths(.matches))]
    Ambiguous { id: String, matches: Vec<NodePath> },

    #[error("Cannot {action} {path}: node is {editable}")]
    LockedNode {
        path: NodePath,
        editable: EditableType,
        action: EditAction,
    },

    #[error("No template loaded")]
    NoDocument,

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("Hydration error: {0}")]
    Hydration(#[from] HydrationError),

    #[error("Catalog error: {0}")]
    Catalog(CatalogError),
}

impl EditorError {
    /// True for errors the UI should report as a blocked action
    pub fn is_locked(&self) -> bool {
        matches!(self, EditorError::LockedNode { .. })
    }
}

impl From<MutationError> for EditorError {
    fn from(e: MutationError) -> Self {
        match e {
            MutationError::NodeNotFound(path) | MutationError::ParentNotFound(path) => {
                EditorError::NotFound(path)
            }
            MutationError::Locked {
                path,
                editable,
                action,
            } => EditorError::LockedNode {
                path,
                editable,
                action,
            },
            MutationError::InvalidStructure(message) => EditorError::InvalidStructure(message),
            MutationError::Schema(violation) => EditorError::Schema(violation),
        }
    }
}

impl From<CatalogError> for EditorError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(id) => EditorError::NotFound(format!("template `{}`", id)),
            other => EditorError::Catalog(other),
        }
    }
}

fn join_paths(paths: &[NodePath]) -> String {
    paths
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
