use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Store failures never leak their cause to the client: the source error is
/// logged and the caller only sees the per-operation message.
#[derive(Debug)]
pub enum ApiError {
    /// No todo with the given id
    TodoNotFound(String),
    /// PATCH body carried no usable field
    NoUpdateFields,
    /// Request body could not be read as the expected JSON shape
    InvalidBody(String),
    /// Store transport or service failure
    Storage {
        message: &'static str,
        source: anyhow::Error,
    },
}

impl ApiError {
    pub fn storage(message: &'static str) -> impl FnOnce(anyhow::Error) -> ApiError {
        move |source| ApiError::Storage { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::TodoNotFound(id) => {
                tracing::info!("Todo not found with id: {}", id);
                (StatusCode::NOT_FOUND, "Todo not found".to_string())
            }
            ApiError::NoUpdateFields => (
                StatusCode::BAD_REQUEST,
                "No valid fields provided to update".to_string(),
            ),
            ApiError::InvalidBody(reason) => {
                tracing::debug!("Rejected request body: {}", reason);
                (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
            }
            ApiError::Storage { message, source } => {
                tracing::error!("{}: {:#}", message, source);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}
