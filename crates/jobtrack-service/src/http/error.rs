use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use jobtrack_core::error::{ErrorCode, JobTrackError};

/// Error wrapper rendered as `{ "code": ..., "message": ... }`.
#[derive(Debug)]
pub struct ApiError(pub JobTrackError);

impl From<JobTrackError> for ApiError {
    fn from(e: JobTrackError) -> Self {
        Self(e)
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::BadRequest | ErrorCode::UnsupportedVersion => StatusCode::BAD_REQUEST,
        ErrorCode::Store => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::MalformedTimestamp | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.code();
        let body = json!({ "code": code.as_str(), "message": self.0.to_string() });
        (status_for(code), Json(body)).into_response()
    }
}
