use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use ktown_common::KtownError;
use ktown_world::WorldError;

/// Failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// `file1` or `file2` missing from the request body.
    MissingInput,
    /// The request body is not a JSON object (wrong content type, bad syntax).
    InvalidBody(JsonRejection),
    /// Building the world from a request body failed.
    WorldData(KtownError),
    /// Building the world from the default exports failed.
    DefaultWorldData(KtownError),
    /// Reading the default exports failed.
    DefaultFiles(KtownError),
}

impl ApiError {
    /// Classify a failure from a request-body build.
    pub fn from_build(err: KtownError) -> Self {
        match err {
            KtownError::World(WorldError::MissingInput { .. }) => Self::MissingInput,
            other => Self::WorldData(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            Self::MissingInput => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "Both file1 and file2 JSON must be provided in the request body."
                    })),
                )
                    .into_response();
            }
            Self::InvalidBody(rejection) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({
                        "error": "Both file1 and file2 JSON must be provided in the request body.",
                        "details": rejection.body_text(),
                    })),
                )
                    .into_response();
            }
            Self::WorldData(e) => {
                error!(error = %e, "Failed to build worldData");
                serde_json::json!({
                    "error": "Failed to build worldData",
                    "details": e.to_string(),
                })
            }
            Self::DefaultWorldData(e) => {
                error!(error = %e, "Failed to build worldData from default files");
                serde_json::json!({
                    "error": "Failed to build worldData from default files",
                    "details": e.to_string(),
                })
            }
            Self::DefaultFiles(e) => {
                error!(error = %e, "Failed to read default JSON files");
                serde_json::json!({
                    "hasDefaults": false,
                    "error": "Failed to read default JSON files",
                    "details": e.to_string(),
                })
            }
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
