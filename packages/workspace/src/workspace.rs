//! # Workspace
//!
//! Couples an [`EditorStore`] to a [`PageBackend`]. Loads are split in two
//! so the store is never touched by half-loaded data:
//!
//! 1. `request_*` issues a ticket and returns a [`PendingLoad`]
//! 2. `PendingLoad::resolve` awaits the backend (no store access)
//! 3. `complete` hands the result to the store, which drops it if a newer
//!    request or selection happened in between
//!
//! Any number of loads may be in flight; only the latest one lands.

use crate::backend::{PageBackend, SavedPage};
use crate::errors::{BackendError, WorkspaceError};
use pagecraft_editor::{EditorStore, MutationOutcome, NoopReason, RequestTicket};
use pagecraft_hydration::serialize_project;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// What a load fetches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Page(String),
    Template(String),
}

impl fmt::Display for LoadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadSource::Page(id) => write!(f, "page `{}`", id),
            LoadSource::Template(id) => write!(f, "template `{}`", id),
        }
    }
}

/// A load that has been issued but not fetched
#[derive(Debug)]
pub struct PendingLoad<B> {
    ticket: RequestTicket,
    source: LoadSource,
    backend: Arc<B>,
}

impl<B: PageBackend> PendingLoad<B> {
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    pub fn source(&self) -> &LoadSource {
        &self.source
    }

    /// Fetch the payload. Backend failures are carried to `complete`.
    pub async fn resolve(self) -> ResolvedLoad {
        let payload = match &self.source {
            LoadSource::Page(id) => self.backend.fetch_page(id).await.map(|page| page.payload),
            LoadSource::Template(id) => self.backend.fetch_template(id).await,
        };

        ResolvedLoad {
            ticket: self.ticket,
            source: self.source,
            payload,
        }
    }
}

/// A fetched load waiting to be applied
#[derive(Debug)]
pub struct ResolvedLoad {
    pub ticket: RequestTicket,
    pub source: LoadSource,
    pub payload: Result<Value, BackendError>,
}

pub struct Workspace<B> {
    backend: Arc<B>,
    store: EditorStore,
}

impl<B: PageBackend> Workspace<B> {
    pub fn new(backend: Arc<B>, store: EditorStore) -> Self {
        Self { backend, store }
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut EditorStore {
        &mut self.store
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn into_store(self) -> EditorStore {
        self.store
    }

    /// Start loading a saved page
    pub fn request_page(&mut self, id: &str) -> PendingLoad<B> {
        self.request(LoadSource::Page(id.to_string()))
    }

    /// Start loading a catalog template from the backend
    pub fn request_template(&mut self, id: &str) -> PendingLoad<B> {
        self.request(LoadSource::Template(id.to_string()))
    }

    fn request(&mut self, source: LoadSource) -> PendingLoad<B> {
        let ticket = self.store.begin_request();
        info!("[request] {} as #{}", source, ticket.id());
        PendingLoad {
            ticket,
            source,
            backend: Arc::clone(&self.backend),
        }
    }

    /// Apply a resolved load. Superseded loads are dropped even if they
    /// failed; a failure of the latest load is reported.
    pub fn complete(&mut self, resolved: ResolvedLoad) -> Result<MutationOutcome, WorkspaceError> {
        if !self.store.is_current(resolved.ticket) {
            info!(
                "[complete] dropping {} (#{} superseded)",
                resolved.source,
                resolved.ticket.id()
            );
            return Ok(MutationOutcome::Noop {
                reason: NoopReason::Superseded,
            });
        }

        let payload = resolved.payload.map_err(|e| {
            warn!("[complete] {} failed: {}", resolved.source, e);
            e
        })?;
        Ok(self.store.complete_request(resolved.ticket, &payload)?)
    }

    /// Request, fetch, and apply in one step
    pub async fn load(&mut self, source: LoadSource) -> Result<MutationOutcome, WorkspaceError> {
        let resolved = self.request(source).resolve().await;
        self.complete(resolved)
    }

    /// Restore the most recently saved page
    pub async fn open_latest(&mut self) -> Result<MutationOutcome, WorkspaceError> {
        let ticket = self.store.begin_request();
        let pages = self.backend.list_pages().await?;
        let latest = pages.into_iter().next().ok_or(WorkspaceError::NoPages)?;

        info!("[open_latest] {} saved at {}", latest.id, latest.updated_at);
        Ok(self.store.complete_request(ticket, &latest.payload)?)
    }

    /// Persist the current template and session under `project_id`
    pub async fn save(&self, project_id: &str) -> Result<SavedPage, WorkspaceError> {
        let snapshot = self.store.snapshot().ok_or(WorkspaceError::NothingToSave)?;
        let payload = serialize_project(&snapshot)?;

        let page = self.backend.save_page(project_id, payload).await?;
        info!("[save] {} at {}", page.id, page.updated_at);
        Ok(page)
    }
}
