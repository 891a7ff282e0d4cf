//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use booking::{BookingError, PaymentError};
use domain::DomainError;
use storage::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// The request clashes with existing data.
    Conflict(String),
    /// Domain rule violated by the request.
    Domain(DomainError),
    /// Repository failure.
    Store(StoreError),
    /// Booking service failure.
    Booking(BookingError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Store(err) => store_error_to_response(err),
            ApiError::Booking(err) => booking_error_to_response(err),
        };

        if status.is_server_error() {
            tracing::error!(error = %message, "internal server error");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::InvalidStatusTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        DomainError::InvalidCapacity(_) | DomainError::InvalidSeatCount(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::UnknownPaymentStatus(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn store_error_to_response(err: StoreError) -> (StatusCode, String) {
    match &err {
        StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

fn booking_error_to_response(err: BookingError) -> (StatusCode, String) {
    match err {
        BookingError::BookingNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        BookingError::Domain(err) => domain_error_to_response(err),
        BookingError::Store(err) => store_error_to_response(err),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        ApiError::Booking(err)
    }
}

/// Errors that prevent the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("payment gateway setup failed: {0}")]
    Payment(#[from] PaymentError),
}
