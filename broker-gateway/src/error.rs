use thiserror::Error;

/// Why a single broker could not be read.
///
/// The aggregator never lets these escape; they only reach the logs.
#[derive(Error, Debug)]
pub enum BrokerError {
    /// Connection refused, timeout, TLS or body decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The broker answered with a non-2xx status.
    #[error("Broker responded with HTTP {0}")]
    Status(u16),
}
