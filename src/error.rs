//! Unified error types for the contribution API.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::error::Category;
use thiserror::Error;
use tracing::error;

use crate::store::DocumentKind;

/// Unified error type for the service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Document persistence errors.
///
/// A missing backing file is not an error: the store serves the default
/// document instead. Everything else surfaces here.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("{kind} document io failed at {}: {source}", .path.display())]
    Io {
        /// Which document.
        kind: DocumentKind,
        /// Backing file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but does not hold a JSON object.
    #[error("{kind} document at {} is not a valid JSON object: {source}", .path.display())]
    Parse {
        /// Which document.
        kind: DocumentKind,
        /// Backing file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized for writing.
    #[error("failed to encode {kind} document: {source}")]
    Encode {
        /// Which document.
        kind: DocumentKind,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The blocking store task panicked or was cancelled.
    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Parse { .. } => "parse",
            Self::Encode { .. } => "encode",
            Self::Task(_) => "task",
        }
    }
}

/// Error returned from HTTP handlers.
#[derive(Debug)]
pub enum ApiError {
    /// The request body is not a JSON object.
    Body(serde_json::Error),
    /// The store failed. Clients only see a bare 500; the detail goes to
    /// the log.
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Body(err) => {
                // Valid JSON of the wrong shape is 422, anything unparseable is 400.
                let status = match err.classify() {
                    Category::Data => StatusCode::UNPROCESSABLE_ENTITY,
                    Category::Syntax | Category::Eof | Category::Io => StatusCode::BAD_REQUEST,
                };
                (status, format!("Failed to parse the request body as a JSON object: {err}"))
                    .into_response()
            }
            Self::Store(err) => {
                error!(kind = err.label(), "request failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;
