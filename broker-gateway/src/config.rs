use serde::{Deserialize, Serialize};
use trading::BrokerType;

/// Where one broker service lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerEndpoint {
    pub name: String,
    /// Trade-listing URL, e.g. `http://localhost:3001/api/trades/broker-a`.
    pub url: String,
    /// Inactive brokers are neither offered at registration nor queried.
    pub active: bool,
}

/// Outbound broker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub broker_a: BrokerEndpoint,
    pub broker_b: BrokerEndpoint,
    /// Transport-level timeout of a single broker request.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            broker_a: BrokerEndpoint {
                name: "Broker A".to_string(),
                url: "http://localhost:3001/api/trades/broker-a".to_string(),
                active: true,
            },
            broker_b: BrokerEndpoint {
                name: "Broker B".to_string(),
                url: "http://localhost:3002/api/trades/broker-b".to_string(),
                active: true,
            },
            timeout_secs: 10,
        }
    }
}

impl GatewayConfig {
    pub fn endpoint(&self, broker: BrokerType) -> &BrokerEndpoint {
        match broker {
            BrokerType::BrokerA => &self.broker_a,
            BrokerType::BrokerB => &self.broker_b,
        }
    }

    pub fn active_brokers(&self) -> Vec<BrokerType> {
        BrokerType::ALL
            .into_iter()
            .filter(|b| self.endpoint(*b).active)
            .collect()
    }
}
