use serde::Serialize;
use thiserror::Error;

/// Errors raised by the pure domain layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradingError {
    /// A broker code that is not `brokerA` or `brokerB`.
    #[error("Unknown broker code: {0}")]
    UnknownBroker(String),
}

/// A single rejected field of an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Every field failure found while reading one payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Validation error")]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(path, message)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Whether `path` was rejected.
    pub fn has(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }
}
