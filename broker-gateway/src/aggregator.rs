//! Concurrent fan-out over every broker a user may read.
//!
//! All authorized brokers are queried at once and the aggregator waits for
//! every one of them. A broker that fails contributes an empty list; the
//! aggregate itself never fails.

use crate::adapter::{BrokerAdapter, HttpBrokerAdapter};
use crate::config::GatewayConfig;
use crate::error::BrokerError;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use trading::{BrokerTrades, BrokerType, RawTrade, RawTradeA, RawTradeB};

#[derive(Clone, Default)]
pub struct Aggregator {
    broker_a: Option<Arc<dyn BrokerAdapter<RawTradeA>>>,
    broker_b: Option<Arc<dyn BrokerAdapter<RawTradeB>>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_broker_a(mut self, adapter: Arc<dyn BrokerAdapter<RawTradeA>>) -> Self {
        self.broker_a = Some(adapter);
        self
    }

    pub fn with_broker_b(mut self, adapter: Arc<dyn BrokerAdapter<RawTradeB>>) -> Self {
        self.broker_b = Some(adapter);
        self
    }

    /// HTTP adapters for every active broker in `config`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, BrokerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut aggregator = Self::new();
        if config.broker_a.active {
            aggregator = aggregator.with_broker_a(Arc::new(HttpBrokerAdapter::<RawTradeA>::new(
                client.clone(),
                config.broker_a.url.clone(),
            )));
        }
        if config.broker_b.active {
            aggregator = aggregator.with_broker_b(Arc::new(HttpBrokerAdapter::<RawTradeB>::new(
                client,
                config.broker_b.url.clone(),
            )));
        }
        Ok(aggregator)
    }

    /// Fetches from every broker in `authorized`, concurrently.
    ///
    /// # Arguments
    ///
    /// * `authorized` - Brokers the caller has access to.
    /// * `token` - Bearer token forwarded to each broker.
    ///
    /// # Returns
    ///
    /// * `BrokerTrades` - One list per broker. Unauthorized, unconfigured or
    ///   unavailable brokers yield an empty list.
    pub async fn fetch_all(&self, authorized: &[BrokerType], token: &str) -> BrokerTrades {
        let (broker_a, broker_b) = tokio::join!(
            fetch_or_empty(self.broker_a.as_deref(), authorized, token),
            fetch_or_empty(self.broker_b.as_deref(), authorized, token),
        );
        BrokerTrades { broker_a, broker_b }
    }
}

async fn fetch_or_empty<T: RawTrade>(
    adapter: Option<&dyn BrokerAdapter<T>>,
    authorized: &[BrokerType],
    token: &str,
) -> Vec<T> {
    if !authorized.contains(&T::BROKER) {
        return Vec::new();
    }
    let Some(adapter) = adapter else {
        warn!("{}: authorized but not configured, skipping", T::BROKER);
        return Vec::new();
    };

    match adapter.fetch(token).await {
        Ok(trades) => {
            info!("{}: fetched {} trades", T::BROKER, trades.len());
            trades
        }
        Err(e) => {
            warn!("{}: source unavailable, continuing without it: {}", T::BROKER, e);
            Vec::new()
        }
    }
}
