//! # REST API for User Management
//!
//! Endpoints for listing, creating, updating and deleting users, and for
//! their payment status.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use tracing::info;

use super::error_response;
use crate::domain::MonthSelector;
use crate::AppState;
use shared::{CreateUserRequest, UpdateUserRequest};

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PendingQuery {
    #[serde(default)]
    pub month: MonthSelector,
}

/// Create a router for user related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/status", get(users_with_status))
        .route("/pending", get(pending_users))
        .route("/:id", put(update_user).delete(delete_user))
}

/// List users, optionally narrowed by `?search=`
async fn list_users(State(state): State<AppState>, Query(query): Query<UserSearchQuery>) -> impl IntoResponse {
    info!("GET /api/users - search: {:?}", query.search);

    match state.user_service.list_users(&query.search).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Failed to list users", e),
    }
}

async fn create_user(State(state): State<AppState>, Json(request): Json<CreateUserRequest>) -> impl IntoResponse {
    info!("POST /api/users - request: {:?}", request);

    match state.user_service.create_user(request).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => error_response("Failed to create user", e),
    }
}

async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/{} - request: {:?}", user_id, request);

    match state.user_service.update_user(&user_id, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Failed to update user", e),
    }
}

/// Delete a user and their payments
async fn delete_user(State(state): State<AppState>, Path(user_id): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/users/{}", user_id);

    match state.user_service.delete_user(&user_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Failed to delete user", e),
    }
}

/// Every user with paid flags for the current and previous month
async fn users_with_status(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/users/status");

    match state.user_service.users_with_status(state.clock.as_ref()).await {
        Ok(statuses) => (StatusCode::OK, Json(statuses)).into_response(),
        Err(e) => error_response("Failed to derive payment status", e),
    }
}

async fn pending_users(State(state): State<AppState>, Query(query): Query<PendingQuery>) -> impl IntoResponse {
    info!("GET /api/users/pending - month: {:?}", query.month);

    match state.user_service.pending_users(state.clock.as_ref(), query.month).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response("Failed to list pending users", e),
    }
}
