//! Content service - translation between wire DTOs and domain models
//!
//! Resolves content type names to ids (and back) through the repository and
//! stamps new content with the injected clock. Content types are only ever
//! read here.

pub mod clock;

use std::sync::Arc;

use crate::db::repos::{ContentRepository, DbError};
use crate::models::{
    Content, ContentResponse, CreateContentRequest, DetailDto, NewContent, NewDetail,
};

pub use clock::{Clock, FixedClock, SystemClock};

/// Service-level failure
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A request named a content type that does not exist
    #[error("unknown content type: '{0}'")]
    UnknownContentType(String),

    /// A stored detail points at a content type that cannot be found
    #[error("content type {0} not found")]
    ContentTypeIdNotFound(i32),

    #[error("failed to access content store")]
    Repository(#[from] DbError),
}

impl ServiceError {
    /// Whether the failure was caused by the client's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownContentType(_))
    }
}

/// Content use cases
#[derive(Clone)]
pub struct ContentService {
    repo: Arc<dyn ContentRepository>,
    clock: Arc<dyn Clock>,
}

impl ContentService {
    pub fn new(repo: Arc<dyn ContentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Service using wall-clock time.
    pub fn with_system_clock(repo: Arc<dyn ContentRepository>) -> Self {
        Self::new(repo, Arc::new(SystemClock))
    }

    /// List all content. No content is an empty list, not an error.
    pub async fn get_content(&self) -> Result<Vec<ContentResponse>, ServiceError> {
        let content = self.repo.get_all_content().await?;
        if content.is_empty() {
            return Ok(Vec::new());
        }

        let mut res = Vec::with_capacity(content.len());
        for c in content {
            res.push(self.to_response(c).await?);
        }
        Ok(res)
    }

    /// Create content and its details, returning the stored result.
    pub async fn create_content(
        &self,
        req: CreateContentRequest,
    ) -> Result<ContentResponse, ServiceError> {
        let content = self.to_new_content(req).await?;
        let created = self.repo.create_content_with_details(&content).await?;
        tracing::info!(id = created.id, details = created.details.len(), "content created");

        self.to_response(created).await
    }

    async fn content_type_id(&self, name: &str) -> Result<i32, ServiceError> {
        match self.repo.get_content_type_by_name(name).await? {
            Some(ct) => Ok(ct.id),
            None => {
                tracing::debug!(name, "unknown content type");
                Err(ServiceError::UnknownContentType(name.to_string()))
            }
        }
    }

    async fn content_type_name(&self, id: i32) -> Result<String, ServiceError> {
        match self.repo.get_content_type_by_id(id).await? {
            Some(ct) => Ok(ct.name),
            None => {
                tracing::error!(id, "stored detail references missing content type");
                Err(ServiceError::ContentTypeIdNotFound(id))
            }
        }
    }

    async fn to_new_content(&self, req: CreateContentRequest) -> Result<NewContent, ServiceError> {
        let now = self.clock.now();

        let requested = req.details.unwrap_or_default();
        let mut details = Vec::with_capacity(requested.len());
        for d in requested {
            details.push(NewDetail {
                content_type_id: self.content_type_id(&d.content_type).await?,
                value: d.value,
            });
        }

        Ok(NewContent {
            title: req.title,
            description: req.description,
            creation_date: now,
            last_modified_date: now,
            details,
        })
    }

    async fn to_response(&self, content: Content) -> Result<ContentResponse, ServiceError> {
        let mut details = Vec::with_capacity(content.details.len());
        for d in content.details {
            details.push(DetailDto {
                content_type: self.content_type_name(d.content_type_id).await?,
                value: d.value,
            });
        }

        Ok(ContentResponse {
            id: content.id,
            title: content.title,
            description: content.description,
            creation_date: content.creation_date,
            last_modified_date: content.last_modified_date,
            details,
        })
    }
}
