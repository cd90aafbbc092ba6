//! HTTP server layer
//!
//! Axum server with:
//! - CORS (all origins, preflight answered by the layer)
//! - Request tracing and timeout
//! - Graceful shutdown
//! - JSON envelope responses

pub mod error;
pub mod response;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, AppState, ServerError};
