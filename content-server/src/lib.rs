//! content-server: HTTP service for content aggregates
//!
//! Exposes `/content` for listing and creating content with typed details,
//! backed by PostgreSQL through a swappable repository.

pub mod config;
pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use config::{ConfigError, DatabaseConfig, ServerConfig};
pub use http::{build_router, run_server, AppState};
pub use service::{Clock, ContentService, FixedClock, ServiceError, SystemClock};
