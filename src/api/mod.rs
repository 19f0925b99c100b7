//! HTTP API module for the document endpoints, health and metrics.

pub mod cors;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
