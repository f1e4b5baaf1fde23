use crate::insight::generate_insights;
use crate::state::AppState;
use crate::store::StoredTrade;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use trading::metrics::calculate_performance_metrics;
use trading::{AnnotatedTrade, PerformanceMetrics};
use trading_core::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub metrics: PerformanceMetrics,
    pub insights: String,
    pub generated_at: DateTime<Utc>,
}

/// `GET /api/analytics`: metrics and generated insights over the caller's
/// closed round trips.
pub async fn analytics(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let claims = state.keys.authenticate(&headers)?;

    let stored = state.trades.list_trades(&claims.user_id).await?;
    if stored.is_empty() {
        return Err(ApiError::not_found("No trade logs found for analysis"));
    }
    // open positions carry no outcome yet
    let trades: Vec<AnnotatedTrade> = stored.iter().filter_map(StoredTrade::annotated).collect();
    if trades.is_empty() {
        return Err(ApiError::not_found("No closed trades to analyse"));
    }

    let metrics = calculate_performance_metrics(&trades);
    let insights = generate_insights(state.insights.as_ref(), &trades).await?;

    Ok(Json(AnalyticsResponse {
        metrics,
        insights: insights.insights,
        generated_at: insights.generated_at,
    }))
}
