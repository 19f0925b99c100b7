//! 401(k) contribution settings API.
//!
//! Persists two JSON documents and serves them over HTTP for the browser
//! frontend:
//!
//! ```text
//! GET  /api/contribution   -> {"type": "percentage", "value": 5}
//! POST /api/contribution   -> {"status": "saved", "data": <body>}
//! GET  /api/ytd            -> {"salary": 100000, ...}
//! POST /api/ytd            -> {"status": "saved", "data": <body>}
//! ```
//!
//! Documents are stored verbatim with no schema. A missing file reads as
//! the built-in default; a corrupt file is an error.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`store`]: Document stores (file-backed and in-memory)
//! - [`api`]: HTTP routes, handlers and CORS policy
//! - [`metrics`]: Prometheus counters for store traffic
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::{Result, ServiceError, StoreError};
