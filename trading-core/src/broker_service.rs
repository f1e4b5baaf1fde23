//! Generic REST service of a mock broker.
//!
//! Both mock brokers expose the same three routes over their own native
//! trade shape:
//!
//! - `GET  /api/trades/<broker>`: every stored trade,
//! - `POST /api/trades/<broker>`: store one validated trade,
//! - `GET  /api/trades/<broker>/sample`: two fixed example trades.
//!
//! Every route except `/health` needs a bearer token carrying the broker's
//! scope.

use crate::auth::AuthKeys;
use crate::config::RunEnvironment;
use crate::error::{expose_error_detail, ApiError};
use crate::server::health_check;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::map_response_with_state;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use trading::{BrokerType, RawTrade};

/// Settings of a mock broker binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerServiceConfig {
    pub port: u16,
    pub environment: RunEnvironment,
    pub jwt_secret: String,
    /// Load the built-in seed trades at startup.
    pub seed: bool,
}

impl BrokerServiceConfig {
    pub fn for_broker(broker: BrokerType) -> Self {
        let port = match broker {
            BrokerType::BrokerA => 3001,
            BrokerType::BrokerB => 3002,
        };
        Self {
            port,
            environment: RunEnvironment::default(),
            jwt_secret: crate::DEFAULT_JWT_SECRET.to_string(),
            seed: true,
        }
    }
}

/// In-memory trade book of one broker.
pub struct BrokerLedger<T> {
    trades: RwLock<Vec<T>>,
}

impl<T: RawTrade> BrokerLedger<T> {
    pub fn new(seed: Vec<T>) -> Self {
        Self {
            trades: RwLock::new(seed),
        }
    }

    pub async fn all(&self) -> Vec<T> {
        self.trades.read().await.clone()
    }

    /// Stores `trade` unless its id is already taken.
    pub async fn insert(&self, trade: T) -> Result<T, ApiError> {
        let mut trades = self.trades.write().await;
        if trades.iter().any(|t| t.trade_id() == trade.trade_id()) {
            return Err(ApiError::bad_request(format!(
                "Trade {} already exists",
                trade.trade_id()
            )));
        }
        trades.push(trade.clone());
        Ok(trade)
    }

    pub async fn len(&self) -> usize {
        self.trades.read().await.len()
    }
}

/// Shared state of a mock broker router.
pub struct BrokerServiceState<T> {
    ledger: Arc<BrokerLedger<T>>,
    keys: AuthKeys,
    samples: fn(DateTime<Utc>) -> Vec<T>,
    environment: RunEnvironment,
}

impl<T> Clone for BrokerServiceState<T> {
    fn clone(&self) -> Self {
        Self {
            ledger: self.ledger.clone(),
            keys: self.keys.clone(),
            samples: self.samples,
            environment: self.environment,
        }
    }
}

impl<T: RawTrade> BrokerServiceState<T> {
    pub fn new(
        ledger: Arc<BrokerLedger<T>>,
        keys: AuthKeys,
        samples: fn(DateTime<Utc>) -> Vec<T>,
    ) -> Self {
        Self {
            ledger,
            keys,
            samples,
            environment: RunEnvironment::default(),
        }
    }

    /// Error bodies carry internal detail when `environment` is development.
    pub fn with_environment(mut self, environment: RunEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Token check, then scope check.
    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let claims = self.keys.authenticate(headers)?;
        claims.require_broker(T::BROKER)
    }
}

pub fn broker_router<T: RawTrade>(state: BrokerServiceState<T>) -> Router {
    let base = format!("/api/trades/{}", T::BROKER.route_segment());

    Router::new()
        .route("/health", get(health_check))
        .route(&base, get(list_trades::<T>).post(create_trade::<T>))
        .route(&format!("{}/sample", base), get(sample_trades::<T>))
        .layer(map_response_with_state(state.environment, expose_error_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_trades<T: RawTrade>(
    State(state): State<BrokerServiceState<T>>,
    headers: HeaderMap,
) -> Result<Json<Vec<T>>, ApiError> {
    state.authorize(&headers)?;
    Ok(Json(state.ledger.all().await))
}

async fn create_trade<T: RawTrade>(
    State(state): State<BrokerServiceState<T>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<T>), ApiError> {
    state.authorize(&headers)?;

    let payload: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {}", e)))?;
    let trade = T::from_payload(&payload, Utc::now())?;
    let saved = state.ledger.insert(trade).await?;

    info!("{}: stored trade {}", T::BROKER, saved.trade_id());
    Ok((StatusCode::CREATED, Json(saved)))
}

async fn sample_trades<T: RawTrade>(
    State(state): State<BrokerServiceState<T>>,
    headers: HeaderMap,
) -> Result<Json<Vec<T>>, ApiError> {
    state.authorize(&headers)?;
    Ok(Json((state.samples)(Utc::now())))
}
