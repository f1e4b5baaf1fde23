//! Compact summary of a trade history, sized for a text-generation prompt.

use crate::metrics::{average_duration, minutes, percent, win_rate};
use crate::model::unified::AnnotatedTrade;
use crate::validation::round2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How many symbols the summary lists.
pub const TOP_SYMBOLS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSummary {
    pub total_trades: usize,
    pub win_rate: String,
    pub profit_loss: ProfitLoss,
    pub avg_trade_duration: String,
    pub top_symbols: Vec<SymbolCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLoss {
    pub total_profit: f64,
    pub total_loss: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub count: usize,
}

impl TradeSummary {
    pub fn from_trades(trades: &[AnnotatedTrade]) -> Self {
        let wins = trades.iter().filter(|t| t.is_win).count();
        let total_profit: f64 = trades.iter().filter(|t| t.is_win).map(|t| t.profit_loss).sum();
        let total_loss: f64 = trades.iter().filter(|t| !t.is_win).map(|t| t.profit_loss).sum();

        Self {
            total_trades: trades.len(),
            win_rate: percent(win_rate(wins, trades.len())),
            profit_loss: ProfitLoss {
                total_profit: round2(total_profit),
                total_loss: round2(total_loss),
                net_profit: round2(total_profit + total_loss),
            },
            avg_trade_duration: minutes(average_duration(trades.iter())),
            top_symbols: top_symbols(trades, TOP_SYMBOLS),
        }
    }
}

/// The `limit` most traded symbols; ties keep first-appearance order.
pub fn top_symbols(trades: &[AnnotatedTrade], limit: usize) -> Vec<SymbolCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<SymbolCount> = Vec::new();

    for trade in trades {
        let slot = *index.entry(trade.symbol()).or_insert_with(|| {
            counts.push(SymbolCount {
                symbol: trade.symbol().to_string(),
                count: 0,
            });
            counts.len() - 1
        });
        counts[slot].count += 1;
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}
