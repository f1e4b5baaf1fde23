//! # Broker Gateway
//!
//! Outbound side of the analytics server: one adapter per broker trade
//! source and the aggregator fanning out over them.

pub mod adapter;
pub mod aggregator;
pub mod config;
pub mod error;

pub use adapter::{BrokerAdapter, HttpBrokerAdapter};
pub use aggregator::Aggregator;
pub use config::{BrokerEndpoint, GatewayConfig};
pub use error::BrokerError;
