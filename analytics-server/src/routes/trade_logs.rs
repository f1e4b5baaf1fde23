use crate::state::AppState;
use crate::store::StoredTrade;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use log::info;
use serde::Serialize;
use std::collections::HashSet;
use trading::annotate::annotate;
use trading::{BrokerTrades, BrokerType, UnifiedTrade};
use trading_core::ApiError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub total_trades_fetched: usize,
}

/// `GET /api/trade-logs`: raw trades of every broker the caller may read.
pub async fn list_broker_trades(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<BrokerTrades>, ApiError> {
    let claims = state.keys.authenticate(&headers)?;
    let token = state.keys.forward(&claims)?;

    let trades = state.aggregator.fetch_all(&claims.broker_types(), &token).await;
    Ok(Json(trades))
}

/// `POST /api/trade-logs/sync`: fetch, normalize, annotate and store.
///
/// Annotation runs over the caller's whole book, stored and fetched, so a
/// trade that arrives late with an earlier timestamp re-pairs the legs
/// around it.
pub async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<SyncResponse>, ApiError> {
    let claims = state.keys.authenticate(&headers)?;
    let token = state.keys.forward(&claims)?;

    let fetched = state.aggregator.fetch_all(&claims.broker_types(), &token).await;
    let fetched = fetched.normalize();

    let stored = state.trades.list_trades(&claims.user_id).await?;
    let book = merge_book(stored.into_iter().map(|t| t.trade), &fetched);
    let legs = annotate(&book);

    let inserted = state.trades.upsert_trades(&claims.user_id, &legs).await?;
    info!(
        "Synced {} new trades for {} ({} fetched, {} in book)",
        inserted,
        claims.username,
        fetched.len(),
        book.len()
    );

    Ok(Json(SyncResponse {
        message: format!("Synced {} new trades", inserted),
        total_trades_fetched: fetched.len(),
    }))
}

/// Stored trades followed by every fetched trade with a new key.
///
/// Stored data wins over a refetched copy of the same trade.
fn merge_book(
    stored: impl IntoIterator<Item = UnifiedTrade>,
    fetched: &[UnifiedTrade],
) -> Vec<UnifiedTrade> {
    let mut seen: HashSet<(String, BrokerType)> = HashSet::new();
    let mut book = Vec::new();
    for trade in stored.into_iter().chain(fetched.iter().cloned()) {
        if seen.insert((trade.id.clone(), trade.broker_type)) {
            book.push(trade);
        }
    }
    book
}

/// `GET /api/trade-logs/stored`
pub async fn list_stored(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<StoredTrade>>, ApiError> {
    let claims = state.keys.authenticate(&headers)?;
    Ok(Json(state.trades.list_trades(&claims.user_id).await?))
}
