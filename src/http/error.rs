use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use crate::error::{ErrorCode, MatrixError};
use crate::output;

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::TaskNotFound | ErrorCode::NoSearchMatches => StatusCode::NOT_FOUND,
        code if code.is_client_error() => StatusCode::BAD_REQUEST,
        ErrorCode::StoreBusy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for MatrixError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);
        if !self.code.is_client_error() {
            error!(code = self.code.as_str(), "request failed: {}", self.message);
        }
        (status, Json(output::json::error(&self))).into_response()
    }
}

impl From<JsonRejection> for MatrixError {
    fn from(rejection: JsonRejection) -> Self {
        MatrixError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for MatrixError {
    fn from(rejection: PathRejection) -> Self {
        MatrixError::validation(rejection.body_text())
    }
}
