//! Outbound adapters, one per broker trade source.

use crate::error::BrokerError;
use async_trait::async_trait;
use log::debug;
use std::marker::PhantomData;
use trading::RawTrade;

/// A source of broker-native trades.
#[async_trait]
pub trait BrokerAdapter<T: RawTrade>: Send + Sync {
    /// Fetches every trade the bearer of `token` may see.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token forwarded to the broker.
    ///
    /// # Returns
    ///
    /// * `Vec<T>` - The broker's trades in its native shape.
    async fn fetch(&self, token: &str) -> Result<Vec<T>, BrokerError>;
}

/// Reads a broker's trade-listing endpoint over HTTP.
pub struct HttpBrokerAdapter<T> {
    client: reqwest::Client,
    endpoint: String,
    _shape: PhantomData<fn() -> T>,
}

impl<T: RawTrade> HttpBrokerAdapter<T> {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            _shape: PhantomData,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<T: RawTrade> BrokerAdapter<T> for HttpBrokerAdapter<T> {
    async fn fetch(&self, token: &str) -> Result<Vec<T>, BrokerError> {
        debug!("{}: GET {}", T::BROKER, self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrokerError::Status(status.as_u16()));
        }
        Ok(response.json::<Vec<T>>().await?)
    }
}
