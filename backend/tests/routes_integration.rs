//! End-to-end checks of the HTTP surface.
#![cfg(feature = "http-server")]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use procurement_timeline::config::TimelineConfig;
use procurement_timeline::http::{create_router, AppState};

fn app() -> Router {
    create_router(AppState::new(TimelineConfig::default()).unwrap())
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_periods_endpoint() {
    let (status, body) = post_json(
        "/v1/timeline/periods",
        json!({"range_start": "2024-01-01", "range_end": "2024-03-31"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["granularity"], "monthly");
    assert_eq!(body["total_days"], 91);
    let cells = body["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 3);
    assert_eq!(cells[1]["label"], "Feb 2024");
    assert_eq!(cells[1]["start"], "2024-02-01");
    assert_eq!(cells[1]["end"], "2024-02-29");
}

#[tokio::test]
async fn test_periods_invalid_range_is_empty() {
    let (status, body) = post_json(
        "/v1/timeline/periods",
        json!({"range_start": "2024-05-01", "range_end": "not-a-date", "granularity": "weekly"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cells"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_days"], 0);
}

#[tokio::test]
async fn test_periods_unknown_locale_is_bad_request() {
    let (status, body) = post_json(
        "/v1/timeline/periods",
        json!({"range_start": "2024-01-01", "range_end": "2024-03-31", "locale": "xx_XX"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_position_endpoint() {
    let (status, body) = post_json(
        "/v1/timeline/position",
        json!({
            "segment_start": "2024-02-10",
            "segment_end": "2024-02-20",
            "timeline_start": "2024-01-01",
            "total_days": 90
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let offset = body["position"]["offset_percent"].as_f64().unwrap();
    let width = body["position"]["width_percent"].as_f64().unwrap();
    assert!((offset - 44.444).abs() < 0.01);
    assert!((width - 11.111).abs() < 0.01);
}

#[tokio::test]
async fn test_position_outside_is_null() {
    let (_, body) = post_json(
        "/v1/timeline/position",
        json!({
            "segment_start": "2025-02-10",
            "segment_end": "2025-02-20",
            "timeline_start": "2024-01-01",
            "total_days": 90
        }),
    )
    .await;
    assert!(body["position"].is_null());
}

#[tokio::test]
async fn test_marker_endpoint() {
    let (_, inside) = post_json(
        "/v1/timeline/marker",
        json!({"date": "2024-01-10", "timeline_start": "2024-01-01", "total_days": 90}),
    )
    .await;
    assert_eq!(inside["offset_percent"], 10.0);

    let (_, outside) = post_json(
        "/v1/timeline/marker",
        json!({"date": "2023-12-31", "timeline_start": "2024-01-01", "total_days": 90}),
    )
    .await;
    assert!(outside["offset_percent"].is_null());
}

#[tokio::test]
async fn test_projection_endpoint() {
    let (status, body) = post_json(
        "/v1/timeline/projection",
        json!({
            "range_start": "2024-01-01",
            "range_end": "2024-06-30",
            "granularity": "quarterly",
            "today": "2024-03-01",
            "items": [
                {"id": "po-1", "start": "2024-02-10", "end": "2024-05-01", "value": 1200.0, "supplier": "Nordic"},
                {"id": "po-2", "start": "2024-04-02", "end": "2024-04-30", "value": 300.0, "supplier": "acme"},
                {"id": "po-3", "value": 99.5, "supplier": "Acme"}
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["columns"].as_array().unwrap().len(), 2);
    assert_eq!(body["columns"][0]["label"], "Q1 2024");
    assert_eq!(body["counts"]["positioned_items"], 2);
    assert_eq!(body["grand_total"], 1599.5);
    assert_eq!(body["formatted_grand_total"], "1,599.50");

    let rows = body["rows"].as_array().unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["Acme", "acme", "Nordic"]);
    assert_eq!(rows[2]["periods"][0]["total"], 1200.0);
    assert_eq!(rows[1]["periods"][1]["total"], 300.0);
    assert!(body["today_marker"].as_f64().is_some());
    assert_eq!(body["fingerprint"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/timeline/projection")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_missing_field_returns_json_error() {
    let (status, body) = post_json(
        "/v1/timeline/position",
        json!({"segment_start": "2024-01-01"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["details"].as_str().unwrap().contains("total_days"));
}

#[tokio::test]
async fn test_missing_content_type_returns_json_error() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/timeline/marker")
                .body(Body::from(r#"{"total_days": 10}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "INVALID_INPUT");
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_draft_is_written_on_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.json");

    let mut config = TimelineConfig::default();
    config.autosave.path = Some(path.clone());
    let app = create_router(AppState::new(config).unwrap());

    let draft = json!({
        "draft": {
            "range_start": "2024-01-01",
            "range_end": "2024-03-31",
            "granularity": "weekly",
            "items": [{"id": "po-1", "value": 10.0, "supplier": "Acme"}]
        }
    });
    let (status, _) = send(&app, "PUT", "/v1/timeline/draft", Some(draft)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/v1/timeline/draft/flush", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["saved"], true);
    assert_eq!(body["stats"]["edits"], 1);
    assert_eq!(body["stats"]["writes"], 1);

    let written: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(written["range_start"], "2024-01-01");
    assert_eq!(written["granularity"], "weekly");
    assert_eq!(written["items"][0]["id"], "po-1");
}

#[tokio::test]
async fn test_draft_endpoints_disabled_without_path() {
    let app = app();
    let (status, body) = send(
        &app,
        "PUT",
        "/v1/timeline/draft",
        Some(json!({"structural": true, "draft": {}})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "DRAFTS_DISABLED");
}
