//! # Membership Tracker Backend
//!
//! Tracks members, the payments recorded against them, and who has paid for
//! the current and previous month.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (month utilities, status derivation, filters, services)
//!     ↓
//! Storage Layer (CSV files or the hosted Supabase tables)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, StorageConfig};
use crate::domain::{Clock, DashboardService, PaymentService, SystemClock, UserService};
use crate::io::rest::{dashboard_apis, month_apis, payment_apis, user_apis};
use crate::storage::csv::{CsvConnection, CsvPaymentRepository, CsvUserRepository};
use crate::storage::{PaymentStorage, SupabaseStore, UserStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub payment_service: PaymentService,
    pub dashboard_service: DashboardService,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Wire every service to the same pair of stores
    pub fn new(users: Arc<dyn UserStorage>, payments: Arc<dyn PaymentStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_service: UserService::new(users.clone(), payments.clone()),
            payment_service: PaymentService::new(payments.clone(), users.clone()),
            dashboard_service: DashboardService::new(users, payments),
            clock,
        }
    }
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage");
    let (users, payments) = match &config.storage {
        StorageConfig::Csv { data_directory } => {
            let connection = CsvConnection::new(data_directory)
                .with_context(|| format!("Failed to open data directory {}", data_directory.display()))?;
            info!("Using CSV store in {}", connection.base_directory().display());

            let users: Arc<dyn UserStorage> = Arc::new(CsvUserRepository::new(connection.clone()));
            let payments: Arc<dyn PaymentStorage> = Arc::new(CsvPaymentRepository::new(connection));
            (users, payments)
        }
        StorageConfig::Supabase { url, key } => {
            let store = Arc::new(SupabaseStore::new(url, key).context("Failed to configure Supabase store")?);
            let users: Arc<dyn UserStorage> = store.clone();
            let payments: Arc<dyn PaymentStorage> = store;
            (users, payments)
        }
    };

    info!("Setting up application state");
    Ok(AppState::new(users, payments, Arc::new(SystemClock)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, frontend_origin: &str) -> Result<Router> {
    let origin = frontend_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid frontend origin: {}", frontend_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/users", user_apis::router())
        .nest("/payments", payment_apis::router())
        .nest("/dashboard", dashboard_apis::router())
        .nest("/months", month_apis::router())
        .route("/health", get(|| async { "ok" }));

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_state, TestEnvironment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use shared::{DashboardSummary, ErrorResponse, MonthOptionsResponse, PaymentListResponse, UserResponse};
    use tower::ServiceExt;

    const ORIGIN: &str = "http://localhost:8080";

    fn app(env: &TestEnvironment) -> Router {
        create_router(test_state(env), ORIGIN).unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let env = TestEnvironment::new().unwrap();
        let (status, body) = send(app(&env), get_request("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");
    }

    #[tokio::test]
    async fn test_user_and_payment_flow() {
        let env = TestEnvironment::new().unwrap();

        let (status, body) = send(
            app(&env),
            json_request(
                "POST",
                "/api/users",
                serde_json::json!({
                    "name": "Jane Doe",
                    "email": "jane@example.com",
                    "mobile": "5551234567",
                    "address": "12 Library Road",
                    "seat_no": "A-12",
                    "joining_date": "2024-01-10"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created: UserResponse = serde_json::from_slice(&body).unwrap();
        let user_id = created.user.id;

        let (status, _) = send(
            app(&env),
            json_request(
                "POST",
                "/api/payments",
                serde_json::json!({
                    "user_id": user_id,
                    "payment_date": "2024-03-05T10:30",
                    "payment_mode": "Bank Transfer",
                    "amount": 750.0,
                    "paid_for_month": "2024-03"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(app(&env), get_request("/api/payments?mode=Bank%20Transfer&email=")).await;
        assert_eq!(status, StatusCode::OK);
        let listed: PaymentListResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(listed.payments.len(), 1);

        let (status, body) = send(app(&env), get_request("/api/dashboard")).await;
        assert_eq!(status, StatusCode::OK);
        let summary: DashboardSummary = serde_json::from_slice(&body).unwrap();
        assert_eq!(summary.current_month.total_collected, 750.0);
        assert_eq!(summary.current_month.pending_users, 0);

        let (status, _) = send(
            app(&env),
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/users/{}", user_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(app(&env), get_request("/api/payments")).await;
        let listed: PaymentListResponse = serde_json::from_slice(&body).unwrap();
        assert!(listed.payments.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_payment_returns_errors() {
        let env = TestEnvironment::new().unwrap();
        let (status, body) = send(
            app(&env),
            json_request(
                "POST",
                "/api/payments",
                serde_json::json!({
                    "user_id": "",
                    "payment_date": "2024-03-05",
                    "payment_mode": "Cash",
                    "amount": 0,
                    "paid_for_month": "March"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.errors.len(), 3);
    }

    #[tokio::test]
    async fn test_pending_rejects_unknown_selector() {
        let env = TestEnvironment::new().unwrap();
        let (status, _) = send(app(&env), get_request("/api/users/pending?month=next")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(app(&env), get_request("/api/users/pending?month=previous")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_months_route() {
        let env = TestEnvironment::new().unwrap();
        let (status, body) = send(app(&env), get_request("/api/months?count=2")).await;
        assert_eq!(status, StatusCode::OK);

        let months: MonthOptionsResponse = serde_json::from_slice(&body).unwrap();
        let labels: Vec<&str> = months.months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["March 2024", "February 2024"]);
    }

    #[test]
    fn test_invalid_origin_is_rejected() {
        let env = TestEnvironment::new().unwrap();
        assert!(create_router(test_state(&env), "bad\norigin").is_err());
    }

    #[test]
    fn test_initialize_backend_with_csv_store() {
        let env = TestEnvironment::new().unwrap();
        let config = AppConfig {
            storage: StorageConfig::Csv {
                data_directory: env.base_directory().join("data"),
            },
            ..AppConfig::default()
        };

        assert!(initialize_backend(&config).is_ok());
        assert!(env.base_directory().join("data").is_dir());
    }
}
