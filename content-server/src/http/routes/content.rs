//! Content endpoints
//!
//! GET and POST on `/content`; any other method gets a 405 `fail` envelope.
//! OPTIONS never reaches these handlers, the CORS layer answers it.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};

use crate::http::response::{self, ContentItem, ContentList};
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::models::CreateContentRequest;

/// GET /content - list all content with details
async fn list_content(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let content = state.service.get_content().await?;
    tracing::debug!(count = content.len(), "content retrieved");

    Ok(response::success(StatusCode::OK, ContentList { content }))
}

/// POST /content - create content with its details
async fn create_content(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateContentRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "invalid request body");
        ApiError::InvalidBody
    })?;

    let content = state.service.create_content(req).await?;

    Ok(response::success(StatusCode::CREATED, ContentItem { content }))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Content routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/content",
        get(list_content)
            .post(create_content)
            .fallback(method_not_allowed),
    )
}
