use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::{Error, ErrorKind};

/// Implements conversion into json response for all possible error variants.
///
/// The body always has the shape `{"detail": "..."}`. Internal failures are
/// reported with a generic message; the actual cause and backtrace are only
/// available through the application logs.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self.kind {
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorKind::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = if self.is_client_error() || status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::trace!("{}", self.kind);
            self.kind.to_string()
        } else {
            tracing::error!("{}", self);
            "Internal server error".to_string()
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
