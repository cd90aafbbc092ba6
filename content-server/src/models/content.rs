//! Content aggregate as stored

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Persisted content together with its owned details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub details: Vec<Detail>,
}

/// A typed value owned by exactly one content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub id: i32,
    pub content_id: i32,
    pub content_type_id: i32,
    pub value: String,
}

/// Reference row classifying detail values (e.g. "text")
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ContentType {
    pub id: i32,
    pub name: String,
}

/// Content not yet written to the store.
///
/// Passed by reference to the repository, which builds a fresh [`Content`]
/// only once the insert transaction commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub last_modified_date: DateTime<Utc>,
    pub details: Vec<NewDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDetail {
    pub content_type_id: i32,
    pub value: String,
}

impl NewContent {
    /// Attach generated ids, producing the persisted aggregate.
    ///
    /// `detail_ids` must be in the same order as `self.details`.
    pub fn into_persisted(self, id: i32, detail_ids: Vec<i32>) -> Content {
        let details = self
            .details
            .into_iter()
            .zip(detail_ids)
            .map(|(d, detail_id)| Detail {
                id: detail_id,
                content_id: id,
                content_type_id: d.content_type_id,
                value: d.value,
            })
            .collect();

        Content {
            id,
            title: self.title,
            description: self.description,
            creation_date: self.creation_date,
            last_modified_date: self.last_modified_date,
            details,
        }
    }
}
