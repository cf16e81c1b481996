// HTTP routes
pub mod classify;
pub mod health;
pub mod patterns;
pub mod projects;

pub use classify::*;
pub use health::*;
pub use patterns::*;
pub use projects::*;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;

use mining::StoreError;

/// Error payload for the REST surface: JSON body plus a proper status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match &err {
            StoreError::PatternNotFound { .. } | StoreError::PageNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            StoreError::InvalidTransition { .. } => StatusCode::CONFLICT,
            StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}
