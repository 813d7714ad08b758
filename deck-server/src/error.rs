use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use deck_service::DeckError;
use serde_json::json;

/// Unified error type that renders as a JSON `{"error": "..."}` response
/// with an appropriate HTTP status code.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DeckError> for AppError {
    fn from(e: DeckError) -> Self {
        let status = match &e {
            DeckError::BadRequest(_) | DeckError::InsufficientCards { .. } => {
                StatusCode::BAD_REQUEST
            }
            DeckError::NotFound(_) => StatusCode::NOT_FOUND,
            DeckError::DuplicateKey(_) => StatusCode::CONFLICT,
            DeckError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            DeckError::EngineClosed => StatusCode::SERVICE_UNAVAILABLE,
            DeckError::DuckDb(_)
            | DeckError::Io(_)
            | DeckError::Storage(_)
            | DeckError::Json(_)
            | DeckError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        Self {
            status,
            message: e.to_string(),
        }
    }
}
