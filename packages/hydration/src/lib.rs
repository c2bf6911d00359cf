//! # Pagecraft Hydration
//!
//! Two-way conversion between the live [`Template`] tree and the JSON layout
//! stored by the persistence backend.
//!
//! ```text
//! payload (serde_json::Value) ──deserialize──▶ Template
//!            ▲                                     │
//!            └────────────── serialize ◀───────────┘
//! ```
//!
//! - `serialize` is deterministic: object keys are sorted and child order is
//!   kept, so the same tree always yields the same bytes.
//! - `deserialize` never stops at the first problem; it walks the whole
//!   payload and reports every violation with its location.
//! - Fields the model does not know about are carried through untouched.

mod error;
mod project;
mod reader;
mod writer;

pub use error::HydrationError;
pub use project::{deserialize_project, serialize_project, ProjectState};
pub use reader::deserialize;
pub use writer::serialize;

use pagecraft_schema::Template;

/// Serialize to deterministic JSON bytes
pub fn to_bytes(template: &Template) -> Result<Vec<u8>, HydrationError> {
    let value = serialize(template)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Parse JSON bytes and hydrate
pub fn from_bytes(bytes: &[u8]) -> Result<Template, HydrationError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    deserialize(&value)
}
