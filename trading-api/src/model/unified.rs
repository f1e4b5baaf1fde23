//! The canonical trade log record and its analytics annotation.

use super::broker::BrokerType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A trade after normalization, independent of the broker it came from.
///
/// `(id, broker_type)` is the natural key of a trade for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedTrade {
    pub id: String,
    pub symbol: String,
    pub quantity: f64,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub broker_type: BrokerType,
    /// The broker-native record, kept verbatim for audit.
    pub original_data: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    Buy,
    Sell,
}

impl TradeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeType::Buy => "buy",
            TradeType::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(TradeType::Buy),
            "sell" => Some(TradeType::Sell),
            _ => None,
        }
    }
}

/// Result of a closed round trip, carried by its closing leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Signed amount; losses are negative.
    pub profit_loss: f64,
    pub is_win: bool,
    /// Whole minutes between the opening and the closing leg.
    pub duration: i64,
}

/// A unified trade with its position in a buy/sell round trip.
///
/// Opening legs have no outcome until a later trade closes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLeg {
    #[serde(flatten)]
    pub trade: UnifiedTrade,
    pub trade_type: TradeType,
    pub outcome: Option<Outcome>,
}

impl TradeLeg {
    pub fn new(trade: UnifiedTrade, trade_type: TradeType, outcome: Option<Outcome>) -> Self {
        Self {
            trade,
            trade_type,
            outcome,
        }
    }

    /// The leg as input for the metrics engine, if it closed a round trip.
    pub fn annotated(&self) -> Option<AnnotatedTrade> {
        self.outcome
            .map(|o| AnnotatedTrade::new(self.trade.clone(), self.trade_type, o))
    }
}

/// A [`UnifiedTrade`] with a known win/loss outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedTrade {
    #[serde(flatten)]
    pub trade: UnifiedTrade,
    pub trade_type: TradeType,
    pub profit_loss: f64,
    pub is_win: bool,
    pub duration: i64,
}

impl AnnotatedTrade {
    pub fn new(trade: UnifiedTrade, trade_type: TradeType, outcome: Outcome) -> Self {
        Self {
            trade,
            trade_type,
            profit_loss: outcome.profit_loss,
            is_win: outcome.is_win,
            duration: outcome.duration,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.trade.symbol
    }
}
