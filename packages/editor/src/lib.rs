//! # Pagecraft Editor
//!
//! Document store for the page builder: the live template, the editing
//! session around it, and undoable tree mutations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ catalog / hydration: JSON → Template        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: EditorStore                         │
//! │  - Load, select, preview                    │
//! │  - Path-addressed mutations with lock checks│
//! │  - Undo/redo history                        │
//! │  - Selection and focus geometry             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer: reads node views, feeds geometry  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **One owner**: the store is the only place the tree changes
//! 2. **All or nothing**: a failed operation leaves the store untouched
//! 3. **Paths, not ids**: ids are unique among siblings only
//! 4. **Preview is read-only**: edits become no-ops, never errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagecraft_editor::{EditorConfig, EditorStore};
//! use pagecraft_schema::NodePath;
//!
//! let catalog = Arc::new(Catalog::builtin()?);
//! let mut store = EditorStore::init(EditorConfig::default(), catalog);
//!
//! store.select_template("business")?;
//! store.select_component("header", "navbar", None)?;
//! store.update_property(
//!     &NodePath::element("header", "navbar", "logo"),
//!     "text",
//!     json!("Acme"),
//! )?;
//! store.undo()?;
//! ```

mod config;
mod errors;
mod mutations;
mod selection;
mod store;
mod undo_stack;

pub use config::EditorConfig;
pub use errors::EditorError;
pub use mutations::{Mutation, MutationError};
pub use selection::FocusTracker;
pub use store::{EditorMode, EditorStore, MutationOutcome, NodeView, NoopReason, RequestTicket};
pub use undo_stack::{HistoryEntry, UndoStack};
