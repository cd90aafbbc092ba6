//! Repository implementations for database access
//!
//! - `content`: the `ContentRepository` capability and its PostgreSQL backend
//! - `memory`: an in-process backend with the same semantics, for tests
//!   and local runs without a database

pub mod content;
pub mod memory;

pub use content::{fold_joined_rows, ContentRepository, DbError, JoinedRow, PgContentRepository};
pub use memory::InMemoryContentRepository;
