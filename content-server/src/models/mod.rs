//! Domain models and wire shapes
//!
//! Domain types mirror the persisted rows; DTOs are what crosses HTTP.

pub mod content;
pub mod dto;

pub use content::{Content, ContentType, Detail, NewContent, NewDetail};
pub use dto::{ContentResponse, CreateContentRequest, DetailDto};
