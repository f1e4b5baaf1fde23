//! # Trading
//!
//! Pure domain layer shared by every service of the workspace. Nothing in
//! here performs I/O.
//!
//! ## Modules
//! - `model`: Broker-native trade shapes, the unified trade log record and
//!   the analytics documents.
//! - `validation`: Field-level checks for inbound trade payloads.
//! - `annotate`: Deterministic buy/sell round-trip matching.
//! - `metrics`: Performance metrics over annotated trades.
//! - `summary`: Compact summary handed to the insight generator.

pub mod annotate;
pub mod error;
pub mod metrics;
pub mod model;
pub mod summary;
pub mod validation;

pub use error::{FieldError, TradingError, ValidationErrors};
pub use model::broker::BrokerType;
pub use model::metrics::{
    FinancialMetrics, OverallMetrics, PerformanceMetrics, SymbolStats, TimeMetrics,
};
pub use model::raw_trade::{BrokerTrades, RawTrade, RawTradeA, RawTradeB};
pub use model::unified::{AnnotatedTrade, Outcome, TradeLeg, TradeType, UnifiedTrade};
pub use summary::{SymbolCount, TradeSummary};

pub mod prelude {
    pub use crate::annotate::annotate;
    pub use crate::metrics::calculate_performance_metrics;
    pub use crate::model::raw_trade::{BrokerTrades, RawTrade, RawTradeA, RawTradeB};
    pub use crate::model::unified::{AnnotatedTrade, TradeLeg, UnifiedTrade};
    pub use crate::summary::TradeSummary;
}
