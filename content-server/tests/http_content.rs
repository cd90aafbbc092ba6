//! End-to-end tests for `/content` over the in-memory repository

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use content_server::db::repos::InMemoryContentRepository;
use content_server::{build_router, AppState, ContentService, FixedClock};

fn app(repo: Arc<InMemoryContentRepository>) -> Router {
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    let service = ContentService::new(repo, Arc::new(clock));
    build_router(AppState::new(service), Duration::from_secs(30))
}

async fn send(app: &Router, method: Method, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri("/content");
    let body = match body {
        Some(b) => {
            builder = builder.header("content-type", "application/json");
            Body::from(b.to_owned())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn empty_listing_is_200_with_empty_list() {
    let app = app(Arc::new(InMemoryContentRepository::new()));

    let (status, body) = send(&app, Method::GET, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "data": {"content": []}}));
}

#[tokio::test]
async fn create_then_list_round_trips() {
    let app = app(Arc::new(InMemoryContentRepository::new()));

    let (status, created) = send(
        &app,
        Method::POST,
        Some(r#"{"title": "T", "description": "D", "details": [{"content_type": "text", "value": "V"}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "success");
    let item = &created["data"]["content"];
    assert_ne!(item["id"], 0);
    assert_eq!(item["creation_date"], "2025-01-01T00:00:00Z");
    assert_eq!(item["last_modified_date"], "2025-01-01T00:00:00Z");

    let (status, listed) = send(&app, Method::GET, None).await;
    assert_eq!(status, StatusCode::OK);

    let content = listed["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["id"], item["id"]);
    assert_eq!(content[0]["title"], "T");
    assert_eq!(content[0]["description"], "D");
    assert_eq!(
        content[0]["details"],
        json!([{"content_type": "text", "value": "V"}])
    );
}

#[tokio::test]
async fn listing_returns_each_aggregate_once_with_all_details() {
    let app = app(Arc::new(InMemoryContentRepository::new()));

    for (title, n) in [("one", 1), ("three", 3), ("none", 0)] {
        let details: Vec<Value> = (0..n)
            .map(|i| json!({"content_type": "text", "value": format!("{title}-{i}")}))
            .collect();
        let body = json!({"title": title, "description": "", "details": details}).to_string();
        let (status, _) = send(&app, Method::POST, Some(&body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, listed) = send(&app, Method::GET, None).await;
    let content = listed["data"]["content"].as_array().unwrap();

    let counts: Vec<(String, usize)> = content
        .iter()
        .map(|c| {
            (
                c["title"].as_str().unwrap().to_owned(),
                c["details"].as_array().unwrap().len(),
            )
        })
        .collect();
    assert_eq!(
        counts,
        [("one".to_owned(), 1), ("three".to_owned(), 3), ("none".to_owned(), 0)]
    );
}

#[tokio::test]
async fn malformed_body_is_400_and_skips_service() {
    let repo = Arc::new(InMemoryContentRepository::new());
    let app = app(repo.clone());

    for body in [
        r#"{"title": "T""#,
        r#"{"title": 5}"#,
        r#"{"details": "text"}"#,
        r#"[1, 2]"#,
        "",
    ] {
        let (status, json) = send(&app, Method::POST, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body:?}");
        assert_eq!(json, json!({"status": "fail", "data": "invalid request body"}));
    }

    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn lenient_bodies_are_created() {
    let repo = Arc::new(InMemoryContentRepository::new());
    let app = app(repo.clone());

    let bodies = [
        r#"{"title": "", "description": "D", "details": []}"#,
        r#"{"title": "T", "description": "D", "details": null}"#,
        r#"{"title": "T", "details": []}"#,
        r#"{"description": "D"}"#,
        "{}",
    ];
    for body in bodies {
        let (status, json) = send(&app, Method::POST, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "body: {body}");
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["content"]["details"], json!([]));
    }

    let (_, listed) = send(&app, Method::GET, None).await;
    let content = listed["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), bodies.len());
    assert_eq!(content[0]["title"], "");
    assert_eq!(content[2]["description"], "");
}

#[tokio::test]
async fn unknown_content_type_fails_without_persisting() {
    let repo = Arc::new(InMemoryContentRepository::new());
    let app = app(repo.clone());

    let (status, json) = send(
        &app,
        Method::POST,
        Some(r#"{"title": "T", "description": "D", "details": [{"content_type": "hologram", "value": "V"}]}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "fail");
    assert_eq!(json["data"], "unknown content type: 'hologram'");
    assert_eq!(repo.content_count(), 0);
}

#[tokio::test]
async fn unsupported_methods_are_405_and_leave_store_unchanged() {
    let repo = Arc::new(InMemoryContentRepository::new());
    let app = app(repo.clone());

    let (status, _) = send(
        &app,
        Method::POST,
        Some(r#"{"title": "T", "description": "D"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    for method in [Method::DELETE, Method::PUT, Method::PATCH] {
        let (status, json) = send(&app, method.clone(), None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "method: {method}");
        assert_eq!(json, json!({"status": "fail", "data": "invalid request method"}));
    }

    assert_eq!(repo.content_count(), 1);
}

#[tokio::test]
async fn store_failure_is_500_error_envelope() {
    let repo = Arc::new(InMemoryContentRepository::new());
    repo.set_failing(true);
    let app = app(repo);

    let (status, json) = send(&app, Method::GET, None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({"status": "error", "message": "failed to access content store"})
    );
}
