//! Analytics documents returned by the metrics engine.
//!
//! Monetary values are rendered with two decimals, as strings where the
//! dashboard displays them verbatim.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub overall: OverallMetrics,
    pub financial: FinancialMetrics,
    pub time: TimeMetrics,
    pub symbols: Vec<SymbolStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallMetrics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// e.g. `"50.00%"`.
    pub win_rate: String,
    /// Wins per loss; equals the win count when there are no losses.
    pub win_loss_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_profit: String,
    pub total_loss: String,
    pub net_profit: String,
    pub average_profit: String,
    pub average_loss: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeMetrics {
    /// e.g. `"20 minutes"`.
    pub average_trade_duration: String,
    pub average_winning_trade_duration: i64,
    pub average_losing_trade_duration: i64,
}

/// Rollup of all trades on one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolStats {
    pub symbol: String,
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub total_profit: f64,
    pub total_loss: f64,
    pub win_rate: String,
    pub net_profit: String,
}
