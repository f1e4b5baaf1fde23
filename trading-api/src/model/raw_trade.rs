//! Broker-native trade shapes.
//!
//! Both brokers describe the same thing with different field names. Each
//! shape knows how to validate itself from an inbound JSON payload and how
//! to map itself onto a [`UnifiedTrade`].

use super::broker::BrokerType;
use super::unified::UnifiedTrade;
use crate::error::ValidationErrors;
use crate::validation::PayloadReader;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Behaviour shared by every broker-native trade record.
pub trait RawTrade: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The broker this shape belongs to.
    const BROKER: BrokerType;

    fn trade_id(&self) -> &str;

    /// Maps the record onto the unified schema. Total over valid records.
    fn normalize(&self) -> UnifiedTrade;

    /// Reads and sanitizes an inbound payload, reporting every bad field.
    ///
    /// # Arguments
    ///
    /// * `payload` - The JSON body as received.
    /// * `now` - Timestamp used when the payload carries none.
    fn from_payload(payload: &Value, now: DateTime<Utc>) -> Result<Self, ValidationErrors>;
}

/// Broker A trade format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTradeA {
    pub trade_id: String,
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

impl RawTradeA {
    pub fn new(
        trade_id: impl Into<String>,
        symbol: impl Into<String>,
        quantity: f64,
        price: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            symbol: symbol.into(),
            quantity,
            price,
            timestamp,
        }
    }
}

impl RawTrade for RawTradeA {
    const BROKER: BrokerType = BrokerType::BrokerA;

    fn trade_id(&self) -> &str {
        &self.trade_id
    }

    fn normalize(&self) -> UnifiedTrade {
        UnifiedTrade {
            id: self.trade_id.clone(),
            symbol: self.symbol.clone(),
            quantity: self.quantity,
            price: self.price,
            timestamp: self.timestamp,
            broker_type: Self::BROKER,
            original_data: json!({
                "tradeId": self.trade_id,
                "symbol": self.symbol,
                "quantity": self.quantity,
                "price": self.price,
                "timestamp": rfc3339(&self.timestamp),
            }),
        }
    }

    fn from_payload(payload: &Value, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;
        let trade_id = reader.string("tradeId");
        let symbol = reader.string("symbol");
        let quantity = reader.positive_number("quantity");
        let price = reader.price("price");
        let timestamp = reader.datetime_or("timestamp", now);
        reader.finish()?;

        match (trade_id, symbol, quantity, price, timestamp) {
            (Some(trade_id), Some(symbol), Some(quantity), Some(price), Some(timestamp)) => {
                Ok(Self::new(
                    trade_id,
                    symbol.to_uppercase(),
                    quantity,
                    price,
                    timestamp,
                ))
            }
            _ => Err(ValidationErrors::single("", "Incomplete payload")),
        }
    }
}

/// Broker B order format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTradeB {
    pub order_id: String,
    pub asset: String,
    pub amount: f64,
    pub cost: f64,
    pub executed_at: DateTime<Utc>,
}

impl RawTradeB {
    pub fn new(
        order_id: impl Into<String>,
        asset: impl Into<String>,
        amount: f64,
        cost: f64,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            asset: asset.into(),
            amount,
            cost,
            executed_at,
        }
    }
}

impl RawTrade for RawTradeB {
    const BROKER: BrokerType = BrokerType::BrokerB;

    fn trade_id(&self) -> &str {
        &self.order_id
    }

    fn normalize(&self) -> UnifiedTrade {
        UnifiedTrade {
            id: self.order_id.clone(),
            symbol: self.asset.clone(),
            quantity: self.amount,
            price: self.cost,
            timestamp: self.executed_at,
            broker_type: Self::BROKER,
            original_data: json!({
                "orderId": self.order_id,
                "asset": self.asset,
                "amount": self.amount,
                "cost": self.cost,
                "executedAt": rfc3339(&self.executed_at),
            }),
        }
    }

    fn from_payload(payload: &Value, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;
        let order_id = reader.string("orderId");
        let asset = reader.string("asset");
        let amount = reader.positive_number("amount");
        let cost = reader.price("cost");
        let executed_at = reader.datetime_or("executedAt", now);
        reader.finish()?;

        match (order_id, asset, amount, cost, executed_at) {
            (Some(order_id), Some(asset), Some(amount), Some(cost), Some(executed_at)) => Ok(
                Self::new(order_id, asset.to_uppercase(), amount, cost, executed_at),
            ),
            _ => Err(ValidationErrors::single("", "Incomplete payload")),
        }
    }
}

fn rfc3339(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Raw trades collected from every broker, still in their native shapes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerTrades {
    pub broker_a: Vec<RawTradeA>,
    pub broker_b: Vec<RawTradeB>,
}

impl BrokerTrades {
    pub fn len(&self) -> usize {
        self.broker_a.len() + self.broker_b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of trades returned by one broker.
    pub fn count(&self, broker: BrokerType) -> usize {
        match broker {
            BrokerType::BrokerA => self.broker_a.len(),
            BrokerType::BrokerB => self.broker_b.len(),
        }
    }

    /// Every trade in the unified schema, broker A first.
    pub fn normalize(&self) -> Vec<UnifiedTrade> {
        self.broker_a
            .iter()
            .map(RawTrade::normalize)
            .chain(self.broker_b.iter().map(RawTrade::normalize))
            .collect()
    }
}
