//! Database layer - connection pool, schema, and repositories
//!
//! # Design Principles
//!
//! - One `PgPool` owned by the process and passed in, never a global
//! - Listing is a single JOIN folded in memory - no N+1 on details
//! - Content and its details are written in one transaction

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, PoolError};
pub use repos::*;
