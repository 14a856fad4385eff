use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parkwise_core::assistant::AssistantError;
use parkwise_core::LotError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<LotError> for AppError {
    fn from(err: LotError) -> Self {
        let msg = err.to_string();
        match err {
            LotError::SpotNotFound(_) | LotError::NoActiveBooking => AppError::NotFoundError(msg),
            LotError::InvalidTransition { .. } | LotError::BookingConflict { .. } => {
                AppError::ConflictError(msg)
            }
            LotError::InvalidDuration { .. } => AppError::ValidationError(msg),
        }
    }
}

impl From<AssistantError> for AppError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::Busy => AppError::ConflictError(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}
