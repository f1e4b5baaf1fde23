//! Identity of an upstream trade source.

use crate::error::TradingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The external brokers a user can be linked to.
///
/// Serialized as the broker *code* (`"brokerA"`, `"brokerB"`), which is also
/// what travels inside JWT `brokers` claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BrokerType {
    #[serde(rename = "brokerA")]
    BrokerA,
    #[serde(rename = "brokerB")]
    BrokerB,
}

impl BrokerType {
    pub const ALL: [BrokerType; 2] = [BrokerType::BrokerA, BrokerType::BrokerB];

    pub fn code(&self) -> &'static str {
        match self {
            BrokerType::BrokerA => "brokerA",
            BrokerType::BrokerB => "brokerB",
        }
    }

    /// Path segment used by the broker's REST service.
    pub fn route_segment(&self) -> &'static str {
        match self {
            BrokerType::BrokerA => "broker-a",
            BrokerType::BrokerB => "broker-b",
        }
    }
}

impl fmt::Display for BrokerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for BrokerType {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BrokerType::ALL
            .into_iter()
            .find(|b| b.code() == s)
            .ok_or_else(|| TradingError::UnknownBroker(s.to_string()))
    }
}
