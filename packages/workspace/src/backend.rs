//! # Page Backend
//!
//! The persistence collaborator: saved pages keyed by project id, and the
//! template catalog as served over the wire. Payloads stay as JSON here and
//! are hydrated by the caller.

use crate::errors::BackendError;
use chrono::{DateTime, Utc};
use pagecraft_catalog::Catalog;
use pagecraft_hydration::{deserialize_project, serialize};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// One saved project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPage {
    pub id: String,
    pub updated_at: DateTime<Utc>,
    pub payload: Value,
}

pub trait PageBackend: Send + Sync {
    /// Saved pages, most recently saved first
    fn list_pages(&self) -> impl Future<Output = Result<Vec<SavedPage>, BackendError>> + Send;

    fn fetch_page(&self, id: &str) -> impl Future<Output = Result<SavedPage, BackendError>> + Send;

    /// One catalog template, serialized
    fn fetch_template(&self, id: &str) -> impl Future<Output = Result<Value, BackendError>> + Send;

    fn save_page(
        &self,
        id: &str,
        payload: Value,
    ) -> impl Future<Output = Result<SavedPage, BackendError>> + Send;
}

/// In-process backend. Pages live in memory, ordered most recent first.
#[derive(Debug)]
pub struct MemoryBackend {
    catalog: Arc<Catalog>,
    pages: RwLock<Vec<SavedPage>>,
    latency: Option<Duration>,
    slow_ids: HashMap<String, Duration>,
}

impl MemoryBackend {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            pages: RwLock::new(Vec::new()),
            latency: None,
            slow_ids: HashMap::new(),
        }
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Delay fetches of one page or template id by `latency` instead
    pub fn with_slow_id(mut self, id: impl Into<String>, latency: Duration) -> Self {
        self.slow_ids.insert(id.into(), latency);
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    async fn wait(&self, id: Option<&str>) {
        let delay = id
            .and_then(|id| self.slow_ids.get(id).copied())
            .or(self.latency);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl PageBackend for MemoryBackend {
    async fn list_pages(&self) -> Result<Vec<SavedPage>, BackendError> {
        self.wait(None).await;
        Ok(self.pages.read().await.clone())
    }

    async fn fetch_page(&self, id: &str) -> Result<SavedPage, BackendError> {
        self.wait(Some(id)).await;
        self.pages
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("page `{}`", id)))
    }

    async fn fetch_template(&self, id: &str) -> Result<Value, BackendError> {
        self.wait(Some(id)).await;
        let template = self
            .catalog
            .get(id)
            .map_err(|_| BackendError::NotFound(format!("template `{}`", id)))?;
        Ok(serialize(template)?)
    }

    /// Rejects payloads that do not hydrate
    async fn save_page(&self, id: &str, payload: Value) -> Result<SavedPage, BackendError> {
        self.wait(None).await;
        deserialize_project(&payload)?;

        let page = SavedPage {
            id: id.to_string(),
            updated_at: Utc::now(),
            payload,
        };

        let mut pages = self.pages.write().await;
        pages.retain(|p| p.id != id);
        pages.insert(0, page.clone());
        debug!("[save_page] {} ({} pages stored)", id, pages.len());
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn backend() -> MemoryBackend {
        MemoryBackend::new(Arc::new(Catalog::builtin().unwrap()))
    }

    fn project(template_id: &str, backend: &MemoryBackend) -> Value {
        let template = backend.catalog().get(template_id).unwrap();
        json!({ "template": serialize(template).unwrap(), "activeTool": "select" })
    }

    #[tokio::test]
    async fn test_pages_listed_most_recent_first() {
        let backend = backend();
        backend.save_page("a", project("business", &backend)).await.unwrap();
        backend.save_page("b", project("portfolio", &backend)).await.unwrap();
        backend.save_page("a", project("storefront", &backend)).await.unwrap();

        let ids: Vec<_> = backend
            .list_pages()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_not_saved() {
        let backend = backend();
        let result = backend.save_page("bad", json!({ "template": 42 })).await;

        assert!(matches!(result, Err(BackendError::Invalid(_))));
        assert!(backend.list_pages().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_unknown_template() {
        let backend = backend();
        assert!(matches!(
            backend.fetch_template("missing").await,
            Err(BackendError::NotFound(_))
        ));
        assert!(backend.fetch_template("business").await.is_ok());
    }
}
