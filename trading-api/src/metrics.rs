//! Performance metrics over annotated trades.
//!
//! Every figure is derived from one partition of the input into winning
//! (`is_win`) and losing trades, so `wins + losses == total` holds at every
//! level, including each symbol.

use crate::model::metrics::{
    FinancialMetrics, OverallMetrics, PerformanceMetrics, SymbolStats, TimeMetrics,
};
use crate::model::unified::AnnotatedTrade;
use crate::validation::round2;
use std::collections::HashMap;


/// Computes the full metrics document for `trades`.
pub fn calculate_performance_metrics(trades: &[AnnotatedTrade]) -> PerformanceMetrics {
    let (winning, losing): (Vec<&AnnotatedTrade>, Vec<&AnnotatedTrade>) =
        trades.iter().partition(|t| t.is_win);

    let total_profit = sum_profit_loss(&winning);
    let total_loss = sum_profit_loss(&losing);

    PerformanceMetrics {
        overall: OverallMetrics {
            total_trades: trades.len(),
            winning_trades: winning.len(),
            losing_trades: losing.len(),
            win_rate: percent(win_rate(winning.len(), trades.len())),
            win_loss_ratio: win_loss_ratio(winning.len(), losing.len()),
        },
        financial: FinancialMetrics {
            total_profit: fixed2(total_profit),
            total_loss: fixed2(total_loss),
            net_profit: fixed2(total_profit + total_loss),
            average_profit: fixed2(average(total_profit, winning.len())),
            average_loss: fixed2(average(total_loss, losing.len())),
        },
        time: TimeMetrics {
            average_trade_duration: minutes(average_duration(trades.iter())),
            average_winning_trade_duration: average_duration(winning.iter().copied()),
            average_losing_trade_duration: average_duration(losing.iter().copied()),
        },
        symbols: calculate_symbol_performance(trades),
    }
}

/// Per-symbol rollup, most traded symbol first.
///
/// Symbols with equal trade counts keep the order in which they first
/// appear in `trades`.
pub fn calculate_symbol_performance(trades: &[AnnotatedTrade]) -> Vec<SymbolStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SymbolAccumulator> = Vec::new();

    for trade in trades {
        let slot = *index.entry(trade.symbol()).or_insert_with(|| {
            groups.push(SymbolAccumulator::new(trade.symbol()));
            groups.len() - 1
        });
        groups[slot].record(trade);
    }

    let mut stats: Vec<SymbolStats> = groups.into_iter().map(SymbolAccumulator::finish).collect();
    // sort_by is stable
    stats.sort_by(|a, b| b.trades.cmp(&a.trades));
    stats
}

struct SymbolAccumulator {
    symbol: String,
    wins: usize,
    losses: usize,
    total_profit: f64,
    total_loss: f64,
}

impl SymbolAccumulator {
    fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            wins: 0,
            losses: 0,
            total_profit: 0.0,
            total_loss: 0.0,
        }
    }

    fn record(&mut self, trade: &AnnotatedTrade) {
        if trade.is_win {
            self.wins += 1;
            self.total_profit += trade.profit_loss;
        } else {
            self.losses += 1;
            self.total_loss += trade.profit_loss;
        }
    }

    fn finish(self) -> SymbolStats {
        let trades = self.wins + self.losses;
        SymbolStats {
            symbol: self.symbol,
            trades,
            wins: self.wins,
            losses: self.losses,
            total_profit: round2(self.total_profit),
            total_loss: round2(self.total_loss),
            win_rate: percent(win_rate(self.wins, trades)),
            net_profit: fixed2(self.total_profit + self.total_loss),
        }
    }
}

fn sum_profit_loss(trades: &[&AnnotatedTrade]) -> f64 {
    trades.iter().map(|t| t.profit_loss).sum()
}

/// Percentage of winners, `0` for an empty set.
pub(crate) fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    wins as f64 / total as f64 * 100.0
}

fn win_loss_ratio(wins: usize, losses: usize) -> f64 {
    if losses == 0 {
        return wins as f64;
    }
    round2(wins as f64 / losses as f64)
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

/// Mean duration in whole minutes, `0` for an empty set.
pub(crate) fn average_duration<'a>(trades: impl Iterator<Item = &'a AnnotatedTrade>) -> i64 {
    let (sum, count) = trades.fold((0i64, 0usize), |(sum, count), t| (sum + t.duration, count + 1));
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as i64
}

/// Two-decimal rendering without a negative zero.
pub fn fixed2(value: f64) -> String {
    let rounded = round2(value);
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.2}", rounded)
}

pub(crate) fn percent(value: f64) -> String {
    format!("{}%", fixed2(value))
}

pub(crate) fn minutes(value: i64) -> String {
    format!("{} minutes", value)
}
