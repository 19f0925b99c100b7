//! HTTP API handlers.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, StoreError};
use crate::store::{Document, DocumentKind, SharedStore, Stores};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document stores.
    pub stores: Stores,
    /// Prometheus handle, when a recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("stores", &self.stores)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

impl AppState {
    /// Create new app state over the given stores.
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Response to a successful save: echoes the stored document.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    /// Always "saved".
    pub status: &'static str,
    /// The document as received.
    pub data: Document,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Prometheus exposition, or 503 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics disabled").into_response(),
    }
}

/// GET /api/contribution - current contribution settings.
pub async fn get_contribution(State(state): State<AppState>) -> Result<Json<Document>, ApiError> {
    load(&state, DocumentKind::Contribution).await
}

/// POST /api/contribution - replace contribution settings.
pub async fn save_contribution(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SavedResponse>, ApiError> {
    save(&state, DocumentKind::Contribution, &body).await
}

/// GET /api/ytd - current year-to-date data.
pub async fn get_ytd(State(state): State<AppState>) -> Result<Json<Document>, ApiError> {
    load(&state, DocumentKind::Ytd).await
}

/// POST /api/ytd - replace year-to-date data.
pub async fn save_ytd(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SavedResponse>, ApiError> {
    save(&state, DocumentKind::Ytd, &body).await
}

async fn load(state: &AppState, kind: DocumentKind) -> Result<Json<Document>, ApiError> {
    let store = SharedStore::clone(state.stores.get(kind));
    let doc = tokio::task::spawn_blocking(move || store.load())
        .await
        .map_err(StoreError::from)??;
    Ok(Json(doc))
}

/// Parse a request body as a document. `Content-Type` is not checked.
fn parse_body(body: &[u8]) -> Result<Document, ApiError> {
    serde_json::from_slice(body).map_err(ApiError::Body)
}

async fn save(
    state: &AppState,
    kind: DocumentKind,
    body: &[u8],
) -> Result<Json<SavedResponse>, ApiError> {
    let payload = parse_body(body)?;
    let store = SharedStore::clone(state.stores.get(kind));
    let doc = tokio::task::spawn_blocking(move || store.save(&payload).map(|()| payload))
        .await
        .map_err(StoreError::from)??;

    info!(document = %kind, fields = doc.len(), "document replaced");
    Ok(Json(SavedResponse {
        status: "saved",
        data: doc,
    }))
}
