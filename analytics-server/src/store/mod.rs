//! Persistence of users and synced trade logs.
//!
//! Handlers only see the [`TradeStore`] and [`UserStore`] traits. Postgres
//! backs them in deployment; the in-memory store serves local runs and
//! tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use trading::{AnnotatedTrade, BrokerType, Outcome, TradeLeg, TradeType, UnifiedTrade};
use trading_core::ApiError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Username or email is taken.
    #[error("Username or email already in use")]
    Conflict,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row that no longer maps onto the domain types.
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ApiError::bad_request(err.to_string()),
            other => ApiError::internal("Storage failure", other),
        }
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub brokers: Vec<BrokerType>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub brokers: Vec<BrokerType>,
}

impl NewUser {
    fn into_user(self, id: String, created_at: DateTime<Utc>) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            brokers: self.brokers,
            created_at,
        }
    }
}

/// A trade log as persisted for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTrade {
    #[serde(flatten)]
    pub trade: UnifiedTrade,
    pub user: String,
    pub trade_type: TradeType,
    #[serde(flatten)]
    pub outcome: Option<Outcome>,
    pub created_at: DateTime<Utc>,
}

impl StoredTrade {
    pub fn new(user: &str, leg: &TradeLeg, created_at: DateTime<Utc>) -> Self {
        Self {
            trade: leg.trade.clone(),
            user: user.to_string(),
            trade_type: leg.trade_type,
            outcome: leg.outcome,
            created_at,
        }
    }

    /// The trade as metrics input, if it closed a round trip.
    pub fn annotated(&self) -> Option<AnnotatedTrade> {
        self.outcome
            .map(|o| AnnotatedTrade::new(self.trade.clone(), self.trade_type, o))
    }
}

#[async_trait]
pub trait TradeStore: Send + Sync {
    /// Inserts every leg whose `(trade id, broker, user)` key is new.
    ///
    /// A leg whose key already exists keeps its stored trade data; only its
    /// round-trip role (`trade_type` and outcome) is replaced. Each leg is
    /// written atomically, so concurrent syncs never store a key twice.
    ///
    /// # Returns
    ///
    /// * `usize` - Number of legs actually inserted.
    async fn upsert_trades(&self, user_id: &str, legs: &[TradeLeg]) -> Result<usize, StoreError>;

    /// Every trade of `user_id`, oldest execution first.
    async fn list_trades(&self, user_id: &str) -> Result<Vec<StoredTrade>, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] when the username or email exists.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}
