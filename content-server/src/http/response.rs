//! Uniform JSON envelope
//!
//! Every response body is `{"status": ..., "data": ...}` for success and
//! client failures, or `{"status": "error", "message": ...}` for server
//! failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::ContentResponse;

/// Used when an error carries no text of its own
pub const NO_ERROR_MESSAGE: &str = "no error message provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
}

/// `success` and `fail` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub status: Status,
    pub data: T,
}

/// `error` envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub status: Status,
    pub message: String,
}

/// `data` payload for GET /content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentList {
    pub content: Vec<ContentResponse>,
}

/// `data` payload for POST /content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub content: ContentResponse,
}

pub fn success<T: Serialize>(code: StatusCode, data: T) -> Response {
    (
        code,
        Json(DataEnvelope {
            status: Status::Success,
            data,
        }),
    )
        .into_response()
}

pub fn fail<T: Serialize>(code: StatusCode, data: T) -> Response {
    (
        code,
        Json(DataEnvelope {
            status: Status::Fail,
            data,
        }),
    )
        .into_response()
}

pub fn error(code: StatusCode, message: impl Into<String>) -> Response {
    let mut message = message.into();
    if message.is_empty() {
        message = NO_ERROR_MESSAGE.to_string();
    }

    (
        code,
        Json(MessageEnvelope {
            status: Status::Error,
            message,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::CONTENT_TYPE;
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_wraps_data() {
        let response = success(StatusCode::OK, json!({"key": "value"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "data": {"key": "value"}})
        );
    }

    #[tokio::test]
    async fn success_with_null_data() {
        let response = success(StatusCode::OK, Option::<()>::None);
        assert_eq!(
            body_json(response).await,
            json!({"status": "success", "data": null})
        );
    }

    #[tokio::test]
    async fn fail_keeps_status_code() {
        let response = fail(StatusCode::BAD_REQUEST, "invalid request body");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"status": "fail", "data": "invalid request body"})
        );
    }

    #[tokio::test]
    async fn error_uses_message_field() {
        let response = error(StatusCode::INTERNAL_SERVER_ERROR, "something went wrong");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"status": "error", "message": "something went wrong"})
        );
    }

    #[tokio::test]
    async fn empty_error_message_is_replaced() {
        let response = error(StatusCode::INTERNAL_SERVER_ERROR, "");
        let body: MessageEnvelope = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.message, NO_ERROR_MESSAGE);
        assert_eq!(body.status, Status::Error);
    }
}
