//! Mapping of core errors onto HTTP responses for the JSON API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cadence_core::error::CadenceError;

/// JSON error body: `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl From<CadenceError> for ApiError {
    fn from(e: CadenceError) -> Self {
        let status = match &e {
            CadenceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CadenceError::NotFound(_) => StatusCode::NOT_FOUND,
            CadenceError::Config(_) | CadenceError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "ok": false, "error": self.message }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(CadenceError::not_found("x")).status, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(CadenceError::invalid_input("empty")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CadenceError::Config("bad".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
