//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::assistant::ChatError;
use crate::booking::flow::FlowError;
use crate::core_state::CoreError;

/// Structured error response body for the frontend.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Blocked: {0}")]
    Blocked(String),
    #[error("Assistant busy")]
    AssistantBusy,
    #[error("No booking session in progress")]
    NoActiveBooking,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Blocked(detail) => (StatusCode::CONFLICT, "BLOCKED", detail.clone()),
            ApiError::AssistantBusy => (
                StatusCode::CONFLICT,
                "ASSISTANT_BUSY",
                "An exchange is already in flight".to_string(),
            ),
            ApiError::NoActiveBooking => (
                StatusCode::CONFLICT,
                "NO_ACTIVE_BOOKING",
                "Start a booking session first".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoActiveBooking => ApiError::NoActiveBooking,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Flow(e) => e.into(),
            CoreError::Chat(e) => e.into(),
            CoreError::Store(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            // Bad input: the request named something that doesn't exist
            FlowError::UnknownService
            | FlowError::DateUnavailable
            | FlowError::SlotUnavailable
            | FlowError::InvalidNationalId => ApiError::BadRequest(err.to_string()),
            // Guarded transition stayed shut
            FlowError::SelectionIncomplete
            | FlowError::NameRequired
            | FlowError::PhoneRequired
            | FlowError::WrongStep(_) => ApiError::Blocked(err.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Busy => ApiError::AssistantBusy,
            ChatError::EmptyInput => ApiError::BadRequest(err.to_string()),
            // Unavailable never reaches the client as an error (the session
            // converts it to a fallback bubble); if it does, it's a bug.
            ChatError::Unavailable(_) | ChatError::MissingApiKey(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
