use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};

use crate::services::stock_moves::{RejectionReason, StockMoveError};

/// JSON envelope for every error response. `code` carries the stable
/// rejection code when the stock-move engine refused a request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Machine-readable reason code, present for stock-move rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable error description
    pub message: String,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Normalize storage errors, surfacing constraint violations as
    /// caller-addressable conflicts instead of opaque database failures.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ServiceError::Conflict("a record with the same unique value already exists".into())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ServiceError::Conflict("the record is referenced by another record".into())
            }
            _ => ServiceError::Database(err),
        }
    }

    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message suitable for HTTP responses. Storage details never cross
    /// the boundary.
    pub fn response_message(&self) -> String {
        match self {
            Self::Database(_) => "Database error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        error_body(self.status_code(), None, self.response_message())
    }
}

/// Rejection -> HTTP status for POST /api/stock_moves.
pub fn rejection_status(reason: RejectionReason) -> StatusCode {
    match reason {
        RejectionReason::ProductNotFound => StatusCode::NOT_FOUND,
        RejectionReason::InvalidMoveType
        | RejectionReason::InvalidQuantity
        | RejectionReason::InsufficientStock => StatusCode::BAD_REQUEST,
    }
}

/// Error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Move rejected: {0}")]
    MoveRejected(RejectionReason),
}

impl From<StockMoveError> for ApiError {
    fn from(err: StockMoveError) -> Self {
        match err {
            StockMoveError::Rejected(reason) => ApiError::MoveRejected(reason),
            StockMoveError::Database(err) => ApiError::Service(ServiceError::Database(err)),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Service(err) => err.into_response(),
            ApiError::NotFound(msg) => error_body(StatusCode::NOT_FOUND, None, msg),
            ApiError::BadRequest(msg) => error_body(StatusCode::BAD_REQUEST, None, msg),
            ApiError::MoveRejected(reason) => error_body(
                rejection_status(reason),
                Some(reason.code().to_string()),
                reason.message().to_string(),
            ),
        }
    }
}

fn error_body(status: StatusCode, code: Option<String>, message: String) -> Response {
    let body = ErrorResponse {
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        code,
        message,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn rejection_status_mapping() {
        assert_eq!(
            rejection_status(RejectionReason::ProductNotFound),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            rejection_status(RejectionReason::InvalidMoveType),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_status(RejectionReason::InvalidQuantity),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            rejection_status(RejectionReason::InsufficientStock),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_details_are_hidden() {
        let err = ServiceError::Database(DbErr::Custom("connection refused on 10.0.0.3".into()));
        assert_eq!(err.response_message(), "Database error");

        // User-facing errors keep their message
        assert_eq!(
            ServiceError::NotFound("Product with ID 7 not found".into()).response_message(),
            "Not found: Product with ID 7 not found"
        );
    }

    #[tokio::test]
    async fn move_rejection_response_carries_stable_code() {
        let response = ApiError::MoveRejected(RejectionReason::InsufficientStock).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(payload.code.as_deref(), Some("INSUFFICIENT_STOCK"));
        assert_eq!(payload.message, "Insufficient stock for OUT move");
    }
}
