use super::{NewUser, StoreError, StoredTrade, TradeStore, User, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use trading::{BrokerType, TradeLeg};

type TradeKey = (String, BrokerType, String);

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    trades: Vec<StoredTrade>,
    /// Position of each key in `trades`.
    trade_keys: HashMap<TradeKey, usize>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TradeStore for MemoryStore {
    async fn upsert_trades(&self, user_id: &str, legs: &[TradeLeg]) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut tables = self.tables.write().await;

        let mut inserted = 0;
        for leg in legs {
            let key = (leg.trade.id.clone(), leg.trade.broker_type, user_id.to_string());
            let position = tables.trade_keys.get(&key).copied();
            match position {
                Some(at) => {
                    let stored = &mut tables.trades[at];
                    stored.trade_type = leg.trade_type;
                    stored.outcome = leg.outcome;
                }
                None => {
                    let at = tables.trades.len();
                    tables.trades.push(StoredTrade::new(user_id, leg, now));
                    tables.trade_keys.insert(key, at);
                    inserted += 1;
                }
            }
        }
        Ok(inserted)
    }

    async fn list_trades(&self, user_id: &str) -> Result<Vec<StoredTrade>, StoreError> {
        let tables = self.tables.read().await;
        let mut trades: Vec<StoredTrade> = tables
            .trades
            .iter()
            .filter(|t| t.user == user_id)
            .cloned()
            .collect();
        trades.sort_by_key(|t| t.trade.timestamp);
        Ok(trades)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(StoreError::Conflict);
        }

        let user = user.into_user(uuid::Uuid::new_v4().to_string(), Utc::now());
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }
}
