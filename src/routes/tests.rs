use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::{ingest, purge, readings, router};
use crate::Storage;

// ---

async fn ready_storage() -> Storage {
    // ---
    let storage = Storage::connect("sqlite::memory:", 1).await.unwrap();
    storage.init_schema().await.unwrap();
    storage
}

/// Storage whose table was never created, so every operation fails.
async fn broken_storage() -> Storage {
    Storage::connect("sqlite::memory:", 1).await.unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    // ---
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn fetch_rows(app: &Router) -> Vec<Value> {
    // ---
    let (status, body) = send(app, empty("GET", readings::READINGS_PATH)).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

fn scenario_payload() -> Value {
    json!({
        "sensor_id": 1,
        "temperatura": 22.1,
        "salinidade": 33.4,
        "ph": 8.0,
        "oxigenio": 9.0,
        "turbidez": 100.0
    })
}

#[tokio::test]
async fn test_single_post_then_get() {
    // ---
    let app = router(ready_storage().await);

    let (status, body) = send(&app, post_json(ingest::INGEST_PATH, scenario_payload())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ingest::INGEST_OK);

    let rows = fetch_rows(&app).await;
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["id"], json!(1));
    assert_eq!(row["sensor_id"], json!(1));
    assert_eq!(row["temperatura"], json!(22.1));
    assert_eq!(row["salinidade"], json!(33.4));
    assert_eq!(row["ph"], json!(8.0));
    assert_eq!(row["oxigenio"], json!(9.0));
    assert_eq!(row["turbidez"], json!(100.0));
    assert!(row["timestamp"].is_string());
}

#[tokio::test]
async fn test_duplicate_posts_get_distinct_ids() {
    // ---
    let app = router(ready_storage().await);

    for _ in 0..2 {
        let (status, _) = send(&app, post_json(ingest::INGEST_PATH, scenario_payload())).await;
        assert_eq!(status, StatusCode::OK);
    }

    let rows = fetch_rows(&app).await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], json!(1));
    assert_eq!(rows[1]["id"], json!(2));
    for field in ["sensor_id", "temperatura", "salinidade", "ph", "oxigenio", "turbidez"] {
        assert_eq!(rows[0][field], rows[1][field], "field {field} differs");
    }
}

#[tokio::test]
async fn test_purge_empty_table() {
    // ---
    let app = router(ready_storage().await);

    let (status, body) = send(&app, empty("DELETE", purge::PURGE_PATH)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, purge::PURGE_OK);

    assert!(fetch_rows(&app).await.is_empty());
}

#[tokio::test]
async fn test_purge_removes_everything_twice() {
    // ---
    let app = router(ready_storage().await);
    send(&app, post_json(ingest::INGEST_PATH, scenario_payload())).await;
    send(&app, post_json(ingest::INGEST_ALIAS_PATH, scenario_payload())).await;

    for _ in 0..2 {
        let (status, _) = send(&app, empty("DELETE", purge::PURGE_PATH)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(fetch_rows(&app).await.is_empty());
    }
}

#[tokio::test]
async fn test_missing_sensor_id_is_null() {
    // ---
    let app = router(ready_storage().await);
    let mut payload = scenario_payload();
    payload.as_object_mut().unwrap().remove("sensor_id");

    let (status, _) = send(&app, post_json(ingest::INGEST_PATH, payload)).await;
    assert_eq!(status, StatusCode::OK);

    let rows = fetch_rows(&app).await;
    assert_eq!(rows[0]["sensor_id"], Value::Null);
    assert_eq!(rows[0]["temperatura"], json!(22.1));
}

#[tokio::test]
async fn test_empty_object_stores_null_row() {
    // ---
    let app = router(ready_storage().await);

    let (status, _) = send(&app, post_json(ingest::INGEST_ALIAS_PATH, json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let rows = fetch_rows(&app).await;
    assert_eq!(rows.len(), 1);
    for field in ["sensor_id", "temperatura", "salinidade", "ph", "oxigenio", "turbidez"] {
        assert_eq!(rows[0][field], Value::Null, "field {field} should be null");
    }
}

#[tokio::test]
async fn test_both_ingest_paths_share_one_sequence() {
    // ---
    let app = router(ready_storage().await);

    send(&app, post_json(ingest::INGEST_PATH, json!({"ph": 7.6}))).await;
    send(&app, post_json(ingest::INGEST_ALIAS_PATH, json!({"ph": 7.7}))).await;
    send(&app, post_json(ingest::INGEST_PATH, json!({"ph": 7.8}))).await;

    let rows = fetch_rows(&app).await;
    let ph: Vec<&Value> = rows.iter().map(|r| &r["ph"]).collect();
    assert_eq!(ph, [&json!(7.6), &json!(7.7), &json!(7.8)]);
}

#[tokio::test]
async fn test_client_timestamp_is_not_stored() {
    // ---
    let app = router(ready_storage().await);
    let mut payload = scenario_payload();
    payload["timestamp"] = json!("2001-01-01T00:00:00Z");

    let (status, _) = send(&app, post_json(ingest::INGEST_ALIAS_PATH, payload)).await;
    assert_eq!(status, StatusCode::OK);

    let rows = fetch_rows(&app).await;
    let stored = rows[0]["timestamp"].as_str().unwrap();
    assert!(!stored.starts_with("2001-01-01"), "stored {stored}");
}

#[tokio::test]
async fn test_missing_content_type_stores_null_row() {
    // ---
    let storage = ready_storage().await;
    let app = router(storage.clone());

    let req = Request::builder()
        .method("POST")
        .uri(ingest::INGEST_PATH)
        .body(Body::from(scenario_payload().to_string()))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ingest::INGEST_OK);

    let rows = fetch_rows(&app).await;
    assert_eq!(rows.len(), 1);
    for field in ["sensor_id", "temperatura", "salinidade", "ph", "oxigenio", "turbidez"] {
        assert_eq!(rows[0][field], Value::Null, "field {field} should be null");
    }
}

#[tokio::test]
async fn test_scalar_json_writes_nothing() {
    // ---
    let storage = ready_storage().await;
    let app = router(storage.clone());

    let (status, _) = send(&app, post_json(ingest::INGEST_PATH, json!(42))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_json_writes_nothing() {
    // ---
    let storage = ready_storage().await;
    let app = router(storage.clone());

    let req = Request::builder()
        .method("POST")
        .uri(ingest::INGEST_PATH)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(&app, req).await;

    assert!(status.is_client_error());
    assert_eq!(storage.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_storage_failures_are_generic_500s() {
    // ---
    let app = router(broken_storage().await);

    let (status, body) = send(&app, post_json(ingest::INGEST_PATH, scenario_payload())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, ingest::INGEST_FAILED);

    let (status, body) = send(&app, empty("GET", readings::READINGS_PATH)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, readings::READINGS_FAILED);

    let (status, body) = send(&app, empty("DELETE", purge::PURGE_PATH)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, purge::PURGE_FAILED);
    assert!(!body.contains("no such table"));
}

#[tokio::test]
async fn test_cors_headers_on_responses() {
    // ---
    let app = router(ready_storage().await);

    let req = Request::builder()
        .uri(readings::READINGS_PATH)
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_cors_preflight() {
    // ---
    let app = router(ready_storage().await);

    let req = Request::builder()
        .method("OPTIONS")
        .uri(purge::PURGE_PATH)
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert!(headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .contains("DELETE"));
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], "content-type");
}

#[tokio::test]
async fn test_health() {
    // ---
    let app = router(ready_storage().await);

    let (status, body) = send(&app, empty("GET", "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"status":"ok"}"#);
}

#[tokio::test]
async fn test_health_reports_closed_storage() {
    // ---
    let storage = ready_storage().await;
    let app = router(storage.clone());
    storage.close().await;

    let (status, body) = send(&app, empty("GET", "/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body, r#"{"status":"unavailable"}"#);
}
