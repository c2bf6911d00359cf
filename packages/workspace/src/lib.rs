//! # Pagecraft Workspace
//!
//! Connects the editor store to page persistence: an async backend seam,
//! an in-memory backend, supersedable loads, and the HTTP API the
//! `pagecraft-server` binary serves.

pub mod api;
pub mod backend;
pub mod errors;
pub mod telemetry;
pub mod workspace;

pub use backend::{MemoryBackend, PageBackend, SavedPage};
pub use errors::{BackendError, WorkspaceError};
pub use workspace::{LoadSource, PendingLoad, ResolvedLoad, Workspace};
