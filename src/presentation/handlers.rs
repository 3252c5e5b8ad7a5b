// HTTP request handlers
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct PeriodQuery {
    /// Plot period in seconds
    pub period: Option<i64>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/plot", get(get_plot))
        .route("/api/nodes/newest", get(get_newest_nodes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Reduced plot data for the requested period
pub async fn get_plot(
    Query(query): Query<PeriodQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, ApiError> {
    let period = query
        .period
        .unwrap_or_else(|| state.plot_service.default_period());
    if period <= 0 {
        return Err(ApiError::BadRequest(format!(
            "period must be a positive number of seconds, got {period}"
        )));
    }

    let plot = state.plot_service.plot(period).await;
    Ok(json_response(plot.as_ref(), accepts_brotli(&headers)).await?)
}

/// Newest reading of every node, with its chart color
pub async fn get_newest_nodes(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response<Body>, ApiError> {
    let nodes = state.plot_service.newest_nodes().await;
    Ok(json_response(&nodes, accepts_brotli(&headers)).await?)
}
