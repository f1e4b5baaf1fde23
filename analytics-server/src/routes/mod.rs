//! HTTP surface of the analytics server.
//!
//! Handlers spell out their own pipeline: authenticate, check scope,
//! validate, then act. There is no hidden middleware between the router
//! and a handler besides CORS. Error detail exposure follows the
//! environment in [`AppState`].

mod analytics;
mod auth;
mod trade_logs;

use crate::state::AppState;
use axum::middleware::map_response_with_state;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use trading_core::error::expose_error_detail;
use trading_core::server::health_check;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/trade-logs", get(trade_logs::list_broker_trades))
        .route("/api/trade-logs/sync", post(trade_logs::sync))
        .route("/api/trade-logs/stored", get(trade_logs::list_stored))
        .route("/api/analytics", get(analytics::analytics))
        .layer(map_response_with_state(state.environment, expose_error_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Trade Analytics API" }))
}
