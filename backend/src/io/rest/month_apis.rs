use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::months::{month_options, DEFAULT_MONTH_OPTIONS};
use crate::AppState;
use shared::MonthOptionsResponse;

/// Upper bound on `?count=`
pub const MAX_MONTH_OPTIONS: usize = 120;

#[derive(Debug, Default, Deserialize)]
pub struct MonthOptionsQuery {
    pub count: Option<usize>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_months))
}

/// Most recent billing months with display labels, newest first
async fn list_months(State(state): State<AppState>, Query(query): Query<MonthOptionsQuery>) -> impl IntoResponse {
    info!("GET /api/months - count: {:?}", query.count);

    let count = query.count.unwrap_or(DEFAULT_MONTH_OPTIONS).min(MAX_MONTH_OPTIONS);
    let months = month_options(state.clock.as_ref(), count);
    (StatusCode::OK, Json(MonthOptionsResponse { months }))
}
