//! # REST API Interface Layer
//!
//! HTTP endpoints for the membership tracker. Handlers translate requests
//! into service calls and map [`DomainError`]s onto status codes:
//!
//! - validation failures: `400` with every field error listed
//! - unknown users: `404`
//! - store failures: `500` with the store's message

pub mod dashboard_apis;
pub mod month_apis;
pub mod payment_apis;
pub mod user_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::DomainError;

/// Build the error response for a failed service call
pub fn error_response(context: &str, error: DomainError) -> Response {
    error!("{}: {}", context, error);

    let (status, errors) = match error {
        DomainError::Validation(ref errors) => (StatusCode::BAD_REQUEST, errors.clone()),
        DomainError::NotFound(_) => (StatusCode::NOT_FOUND, Vec::new()),
        DomainError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()),
    };

    let body = ErrorResponse {
        message: error.to_string(),
        errors,
    };
    (status, Json(body)).into_response()
}
