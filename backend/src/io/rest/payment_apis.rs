//! # REST API for Payments

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use super::error_response;
use crate::domain::PaymentFilters;
use crate::AppState;
use shared::{CreatePaymentRequest, PaymentFilterRequest};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_payments).post(create_payment))
}

/// List payments newest first, filtered by `?email=&phone=&mode=&date=`
async fn list_payments(State(state): State<AppState>, Query(query): Query<PaymentFilterRequest>) -> impl IntoResponse {
    info!("GET /api/payments - query: {:?}", query);

    let filters = PaymentFilters::from(query);
    match state.payment_service.list_payments(&filters).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Failed to list payments", e),
    }
}

/// Record a payment
async fn create_payment(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    info!("POST /api/payments - request: {:?}", request);

    match state.payment_service.create_payment(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("Failed to create payment", e),
    }
}
