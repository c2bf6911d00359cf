//! HTTP surface of a [`PageBackend`]
//!
//! - `GET  /api/pages`          saved pages, most recent first
//! - `GET  /api/pages/:id`      one saved page
//! - `POST /api/pages/:id`      save a project payload
//! - `GET  /api/templates/:id`  one catalog template

use crate::backend::{PageBackend, SavedPage};
use crate::errors::BackendError;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub fn router<B: PageBackend + 'static>(backend: Arc<B>) -> Router {
    Router::new()
        .route("/api/pages", get(list_pages::<B>))
        .route("/api/pages/:id", get(fetch_page::<B>).post(save_page::<B>))
        .route("/api/templates/:id", get(fetch_template::<B>))
        .with_state(backend)
}

async fn list_pages<B: PageBackend>(
    State(backend): State<Arc<B>>,
) -> Result<Json<Vec<SavedPage>>, ApiError> {
    Ok(Json(backend.list_pages().await?))
}

async fn fetch_page<B: PageBackend>(
    State(backend): State<Arc<B>>,
    Path(id): Path<String>,
) -> Result<Json<SavedPage>, ApiError> {
    Ok(Json(backend.fetch_page(&id).await?))
}

async fn save_page<B: PageBackend>(
    State(backend): State<Arc<B>>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<SavedPage>, ApiError> {
    Ok(Json(backend.save_page(&id, payload).await?))
}

async fn fetch_template<B: PageBackend>(
    State(backend): State<Arc<B>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(backend.fetch_template(&id).await?))
}

/// Backend failure mapped to a status code and JSON body
pub struct ApiError(BackendError);

impl From<BackendError> for ApiError {
    fn from(e: BackendError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            BackendError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.0.to_string() })),
            BackendError::Invalid(e) => {
                let violations: Vec<String> = e.violations().iter().map(|v| v.to_string()).collect();
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": self.0.to_string(), "violations": violations }),
                )
            }
            BackendError::Unavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.0.to_string() }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
