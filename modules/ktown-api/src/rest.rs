use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::Span;

use ktown_common::KtownError;
use ktown_world::{build_world_data, WorldData};

use crate::defaults;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct WorldDataRequest {
    #[serde(default)]
    file1: Option<Value>,
    #[serde(default)]
    file2: Option<Value>,
    #[serde(default)]
    books: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldDataResponse {
    world_data: WorldData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultFilesResponse {
    has_defaults: bool,
    file1: Value,
    file2: Value,
    books: Value,
}

/// `spawn_blocking` that keeps the caller's span, so logs from the blocking
/// closure stay attached to the request that caused them.
pub fn spawn_blocking_in_span<F, T>(f: F) -> JoinHandle<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let span = Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(f))
}

/// Run the merge off the async runtime; it is pure CPU work over possibly
/// very large documents.
async fn build_world(
    file1: Option<Value>,
    file2: Option<Value>,
    books: Option<Value>,
) -> Result<WorldData, KtownError> {
    let world = spawn_blocking_in_span(move || {
        build_world_data(file1.as_ref(), file2.as_ref(), books.as_ref())
    })
    .await
    .map_err(anyhow::Error::new)??;
    Ok(world)
}

// --- Handlers ---

pub async fn api_world_data(
    payload: Result<Json<WorldDataRequest>, JsonRejection>,
) -> Result<Json<WorldDataResponse>, ApiError> {
    let Json(body) = payload.map_err(ApiError::InvalidBody)?;
    let world_data = build_world(body.file1, body.file2, body.books)
        .await
        .map_err(ApiError::from_build)?;
    Ok(Json(WorldDataResponse { world_data }))
}

pub async fn api_world_data_from_defaults(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WorldDataResponse>, ApiError> {
    let docs = defaults::load(&state.config)
        .await
        .map_err(ApiError::DefaultWorldData)?;
    let world_data = build_world(Some(docs.file1), Some(docs.file2), Some(docs.books))
        .await
        .map_err(ApiError::DefaultWorldData)?;
    Ok(Json(WorldDataResponse { world_data }))
}

pub async fn api_default_files(State(state): State<Arc<AppState>>) -> Response {
    let status = defaults::check(&state.config).await;
    if !status.all_present() {
        return Json(serde_json::json!({
            "hasDefaults": false,
            "hasFile1": status.has_file1,
            "hasFile2": status.has_file2,
            "hasBooks": status.has_books,
        }))
        .into_response();
    }

    match defaults::load(&state.config).await {
        Ok(docs) => Json(DefaultFilesResponse {
            has_defaults: true,
            file1: docs.file1,
            file2: docs.file2,
            books: docs.books,
        })
        .into_response(),
        Err(e) => ApiError::DefaultFiles(e).into_response(),
    }
}
