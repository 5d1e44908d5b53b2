//! Router tests: each request goes through the full middleware stack via
//! `oneshot`, with default exports written to a temp public dir.

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use ktown_api::{build_router, AppState};
use ktown_common::Config;

fn app(public_dir: &Path) -> Router {
    let config = Config {
        public_dir: public_dir.to_path_buf(),
        ..Config::default()
    };
    build_router(Arc::new(AppState { config }))
}

fn write_defaults(dir: &TempDir, file1: &Value, file2: &Value, books: &Value) {
    let big = dir.path().join("big");
    std::fs::create_dir_all(&big).unwrap();
    std::fs::write(big.join("map_plus.json"), file1.to_string()).unwrap();
    std::fs::write(big.join("map.json"), file2.to_string()).unwrap();
    std::fs::write(big.join("books.json"), books.to_string()).unwrap();
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_world(body: Value) -> Request<Body> {
    Request::post("/api/world-data")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::get(path).body(Body::empty()).unwrap()
}

fn sample_file1() -> Value {
    json!({"df_world": {
        "regions": {"region": {"id": 1, "coords": "0,0|1,0", "type": "Hills"}},
        "historical_figures": {"historical_figure": {"id": 7, "race": "dwarf"}}
    }})
}

fn sample_file2() -> Value {
    json!({"df_world": {
        "regions": {"region": {"id": 1, "name": "The Hills of Luck"}},
        "sites": {"site": {"id": 9, "coords": "1,0", "structures": {"structure": {"id": 0, "inhabitant": 7}}}},
        "historical_figures": {"historical_figure": {"id": 7, "name": "Urist"}}
    }})
}

#[tokio::test]
async fn health_is_ok() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send(app(dir.path()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn posted_exports_build_world_data() {
    let dir = TempDir::new().unwrap();
    let request = post_world(json!({"file1": sample_file1(), "file2": sample_file2()}));
    let (status, body) = send_json(app(dir.path()), request).await;

    assert_eq!(status, StatusCode::OK);
    let cells = body["worldData"]["cells"].as_array().unwrap();
    assert_eq!(cells.len(), 2);
    assert_eq!(cells[0]["key"], json!("0,0"));
    assert_eq!(cells[0]["region"]["name"], json!("The Hills of Luck"));
    assert!(cells[0]["region"].get("coords").is_none());
    assert_eq!(cells[1]["sites"][0]["inhabitants"], json!(["7"]));
    assert_eq!(cells[1]["historical_figures"][0]["name"], json!("Urist"));
    assert_eq!(cells[1]["historical_figures"][0]["race"], json!("dwarf"));
}

#[tokio::test]
async fn missing_file_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let (status, body) =
        send_json(app(dir.path()), post_world(json!({"file1": sample_file1()}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Both file1 and file2 JSON must be provided in the request body.")
    );
}

#[tokio::test]
async fn body_without_json_content_type_is_a_json_bad_request() {
    let dir = TempDir::new().unwrap();
    let request = Request::post("/api/world-data")
        .body(Body::from(
            json!({"file1": sample_file1(), "file2": sample_file2()}).to_string(),
        ))
        .unwrap();
    let (status, body) = send_json(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Both file1 and file2 JSON must be provided in the request body.")
    );
    assert!(body["details"].is_string());
}

#[tokio::test]
async fn unparseable_body_is_a_json_bad_request() {
    let dir = TempDir::new().unwrap();
    let request = Request::post("/api/world-data")
        .header("content-type", "application/json")
        .body(Body::from("{\"file1\": "))
        .unwrap();
    let (status, body) = send_json(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn null_file_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let request = post_world(json!({"file1": null, "file2": sample_file2()}));
    let (status, _) = send_json(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_object_file_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let request = post_world(json!({"file1": 5, "file2": sample_file2()}));
    let (status, body) = send_json(app(dir.path()), request).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Failed to build worldData"));
    assert_eq!(body["details"], json!("file1 must be a JSON object, found a number"));
}

#[tokio::test]
async fn default_files_report_what_is_missing() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send_json(app(dir.path()), get("/api/default-files")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"hasDefaults": false, "hasFile1": false, "hasFile2": false, "hasBooks": false})
    );
}

#[tokio::test]
async fn default_files_are_returned_when_present() {
    let dir = TempDir::new().unwrap();
    write_defaults(&dir, &sample_file1(), &sample_file2(), &json!([]));
    let (status, body) = send_json(app(dir.path()), get("/api/default-files")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hasDefaults"], json!(true));
    assert_eq!(body["file1"], sample_file1());
    assert_eq!(body["books"], json!([]));
}

#[tokio::test]
async fn unreadable_default_file_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    write_defaults(&dir, &sample_file1(), &sample_file2(), &json!([]));
    std::fs::write(dir.path().join("big").join("map.json"), "{not json").unwrap();
    let (status, body) = send_json(app(dir.path()), get("/api/default-files")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["hasDefaults"], json!(false));
    assert_eq!(body["error"], json!("Failed to read default JSON files"));
}

#[tokio::test]
async fn root_builds_from_default_files() {
    let dir = TempDir::new().unwrap();
    let books = json!([{"id": 3, "title": "The Tome", "author_hfid": 7}]);
    write_defaults(&dir, &sample_file1(), &sample_file2(), &books);
    let (status, body) = send_json(app(dir.path()), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    let site = &body["worldData"]["cells"][1]["sites"][0];
    assert_eq!(site["historical_figures"][0]["books"][0]["title"], json!("The Tome"));
}

#[tokio::test]
async fn root_without_defaults_is_a_server_error() {
    let dir = TempDir::new().unwrap();
    let (status, body) = send_json(app(dir.path()), get("/")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Failed to build worldData from default files"));
    assert!(body["details"].as_str().unwrap().starts_with("Default files missing"));
}

#[tokio::test]
async fn other_paths_serve_static_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("legend.txt"), "dwarves").unwrap();
    let (status, body) = send(app(dir.path()), get("/legend.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"dwarves");
}
