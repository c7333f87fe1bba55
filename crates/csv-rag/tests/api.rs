//! HTTP API tests against the full router

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tower::ServiceExt;

use csv_rag::{
    config::RagConfig,
    providers::{CompletionProvider, LocalBlobStore},
    server::{router, state::AppState},
    storage::FileRecordDb,
    Error, FileService, Result,
};

const BOUNDARY: &str = "csv-rag-test-boundary";

struct EchoCompletion {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl CompletionProvider for EchoCompletion {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().push(prompt.to_string());
        self.reply
            .clone()
            .ok_or_else(|| Error::upstream("model unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo-1"
    }
}

struct TestApp {
    dir: tempfile::TempDir,
    completion: Arc<EchoCompletion>,
    state: AppState,
    router: Router,
}

fn app_with(reply: Option<&str>) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let completion = Arc::new(EchoCompletion {
        reply: reply.map(str::to_string),
        prompts: Mutex::new(Vec::new()),
    });

    let service = FileService::new(
        Arc::new(LocalBlobStore::new(dir.path()).unwrap()),
        Arc::new(FileRecordDb::in_memory().unwrap()),
        completion.clone(),
    );
    let state = AppState::from_service(RagConfig::default(), service);
    state.set_ready(true);

    TestApp {
        dir,
        completion,
        router: router(state.clone()),
        state,
    }
}

fn app() -> TestApp {
    app_with(Some("There are 2 rows."))
}

fn multipart_body(field: &str, filename: Option<&str>, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn upload(router: &Router, filename: &str, content: &[u8]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("file", Some(filename), content)))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

async fn delete(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(router, request).await
}

async fn query(router: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

fn blob_count(app: &TestApp) -> usize {
    std::fs::read_dir(app.dir.path()).unwrap().count()
}

#[tokio::test]
async fn test_upload_list_preview_query() {
    let app = app();

    let (status, body) = upload(&app.router, "a.csv", b"name,age\nAlice,30\nBob,25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["file_name"], "a.csv");
    assert_eq!(body["message"], "Upload successful");
    let file_id = body["file_id"].as_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&file_id).is_ok());

    let (status, body) = get(&app.router, "/files").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"files": [{"file_id": file_id, "file_name": "a.csv"}]}));

    let (status, body) = get(&app.router, &format!("/preview/{}", file_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"name": "Alice", "age": 30}, {"name": "Bob", "age": 25}])
    );

    let (status, body) = query(
        &app.router,
        json!({"file_id": file_id, "query": "How many rows?"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "There are 2 rows."}));

    let prompts = app.completion.prompts.lock().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("CSV Data:\n"));
    assert!(prompts[0].contains("Alice"));
    assert!(prompts[0].contains("Bob"));
    assert!(prompts[0].ends_with("\n\nQuery: How many rows?"));
}

#[tokio::test]
async fn test_preview_pads_short_rows() {
    let app = app();
    let (_, body) = upload(&app.router, "ragged.csv", b"a,b,c\n1,2\n3,4,5\n").await;
    let file_id = body["file_id"].as_str().unwrap();

    let (status, body) = get(&app.router, &format!("/preview/{}", file_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"a": 1, "b": 2, "c": null}, {"a": 3, "b": 4, "c": 5}]));
}

#[tokio::test]
async fn test_preview_is_capped_at_five_rows() {
    let app = app();
    let (_, body) = upload(&app.router, "n.csv", b"n\n1\n2\n3\n4\n5\n6\n7\n8\n").await;
    let file_id = body["file_id"].as_str().unwrap();

    let (_, body) = get(&app.router, &format!("/preview/{}", file_id)).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], json!({"n": 1}));
    assert_eq!(rows[4], json!({"n": 5}));
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let app = app();
    let missing = uuid::Uuid::new_v4().to_string();

    let (status, body) = get(&app.router, &format!("/preview/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found");
    assert_eq!(body["error"]["message"], "File not found");

    let (status, _) = query(&app.router, json!({"file_id": missing, "query": "?"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.completion.prompts.lock().is_empty());

    let (status, body) = delete(&app.router, &format!("/file/{}", missing)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "File not found");
}

#[tokio::test]
async fn test_delete_removes_file() {
    let app = app();
    let (_, keep) = upload(&app.router, "keep.csv", b"x\n1\n").await;
    let (_, gone) = upload(&app.router, "gone.csv", b"x\n2\n").await;
    let gone_id = gone["file_id"].as_str().unwrap();
    assert_eq!(blob_count(&app), 2);

    let (status, body) = delete(&app.router, &format!("/file/{}", gone_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "File deleted successfully"}));
    assert_eq!(blob_count(&app), 1);

    let (status, _) = get(&app.router, &format!("/preview/{}", gone_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app.router, &format!("/file/{}", gone_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = get(&app.router, "/files").await;
    assert_eq!(
        listed,
        json!({"files": [{"file_id": keep["file_id"], "file_name": "keep.csv"}]})
    );
}

#[tokio::test]
async fn test_identical_uploads_get_distinct_ids() {
    let app = app();
    let (_, first) = upload(&app.router, "a.csv", b"x\n1\n").await;
    let (_, second) = upload(&app.router, "a.csv", b"x\n1\n").await;
    assert_ne!(first["file_id"], second["file_id"]);

    let (_, listed) = get(&app.router, "/files").await;
    assert_eq!(listed["files"].as_array().unwrap().len(), 2);
    assert_eq!(blob_count(&app), 2);
}

#[tokio::test]
async fn test_listing_twice_is_identical() {
    let app = app();
    let (_, empty) = get(&app.router, "/files").await;
    assert_eq!(empty, json!({"files": []}));

    upload(&app.router, "a.csv", b"x\n1\n").await;
    upload(&app.router, "b.csv", b"y\n2\n").await;

    let (_, first) = get(&app.router, "/files").await;
    let (_, second) = get(&app.router, "/files").await;
    assert_eq!(first, second);
    assert_eq!(first["files"][0]["file_name"], "a.csv");
    assert_eq!(first["files"][1]["file_name"], "b.csv");
}

#[tokio::test]
async fn test_malformed_csv_is_rejected() {
    let app = app();

    let (status, body) = upload(&app.router, "bad.csv", b"a,b\n1,2,3\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "parse_error");

    let (status, _) = upload(&app.router, "empty.csv", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = get(&app.router, "/files").await;
    assert_eq!(listed, json!({"files": []}));
    assert_eq!(blob_count(&app), 0);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body("notes", None, b"hello")))
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from("x\n1\n"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_query_upstream_failure_is_503() {
    let app = app_with(None);
    let (_, body) = upload(&app.router, "a.csv", b"x\n1\n").await;

    let (status, body) = query(
        &app.router,
        json!({"file_id": body["file_id"], "query": "Sum of x?"}),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["type"], "upstream_error");
}

#[tokio::test]
async fn test_query_with_bad_body() {
    let app = app();
    let (status, body) = query(&app.router, json!({"question": "?"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request");
}

#[tokio::test]
async fn test_health_and_info() {
    let app = app();

    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");

    let (status, _) = get(&app.router, "/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app.router, "/info").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "csv-rag");
    assert_eq!(body["providers"]["completion"], "echo");
    assert_eq!(body["providers"]["record_store"], "sqlite");
}

#[tokio::test]
async fn test_ready_follows_state() {
    let app = app();

    app.state.set_ready(false);
    let (status, _) = get(&app.router, "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    app.state.set_ready(true);
    let (status, _) = get(&app.router, "/ready").await;
    assert_eq!(status, StatusCode::OK);
}
