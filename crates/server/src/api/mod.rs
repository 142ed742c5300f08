//! Request handlers.

mod health;
mod query;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use netbuilder_core::BuilderError;
use serde_json::json;

pub use health::health;
pub use query::{query_get, query_post};

/// Error body returned by every handler: `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<BuilderError> for ApiError {
    fn from(e: BuilderError) -> Self {
        let status = match &e {
            BuilderError::Config(_) | BuilderError::MalformedRecord(_) => StatusCode::BAD_REQUEST,
            BuilderError::Source(_) => StatusCode::BAD_GATEWAY,
            BuilderError::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
