//! JSON shapes for the `/content` endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detail as seen by clients: content type by name, not id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailDto {
    pub content_type: String,
    pub value: String,
}

/// POST /content body
///
/// Every field is optional on the wire. `details` may be absent or `null`,
/// both meaning no details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Option<Vec<DetailDto>>,
}

/// Content item returned by GET and POST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub details: Vec<DetailDto>,
}
