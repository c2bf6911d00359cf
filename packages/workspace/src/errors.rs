//! Error types for the workspace

use pagecraft_editor::EditorError;
use pagecraft_hydration::HydrationError;
use thiserror::Error;

/// Failures reported by a [`crate::PageBackend`]
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid payload: {0}")]
    Invalid(#[from] HydrationError),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Hydration error: {0}")]
    Hydration(#[from] HydrationError),

    #[error("No saved pages")]
    NoPages,

    #[error("Nothing to save: no template loaded")]
    NothingToSave,
}
