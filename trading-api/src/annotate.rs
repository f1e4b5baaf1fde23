//! Deterministic buy/sell round-trip matching.
//!
//! Brokers only report executions, not their side. Within one broker and
//! one symbol, executions are taken in time order and paired: the first
//! opens a position (buy), the next closes it (sell), and so on. The closing
//! leg carries the outcome of the round trip.

use crate::model::broker::BrokerType;
use crate::model::unified::{Outcome, TradeLeg, TradeType, UnifiedTrade};
use std::collections::BTreeMap;

/// Annotates every trade with its round-trip role.
///
/// The output keeps the order of `trades`. A trailing unmatched buy has no
/// outcome.
pub fn annotate(trades: &[UnifiedTrade]) -> Vec<TradeLeg> {
    let mut books: BTreeMap<(BrokerType, &str), Vec<usize>> = BTreeMap::new();
    for (i, trade) in trades.iter().enumerate() {
        books
            .entry((trade.broker_type, trade.symbol.as_str()))
            .or_default()
            .push(i);
    }

    let mut legs: Vec<Option<TradeLeg>> = vec![None; trades.len()];
    for positions in books.values_mut() {
        // stable: same-timestamp executions keep their input order
        positions.sort_by_key(|&i| trades[i].timestamp);

        for pair in positions.chunks(2) {
            match *pair {
                [open, close] => {
                    let outcome = round_trip(&trades[open], &trades[close]);
                    legs[open] = Some(TradeLeg::new(trades[open].clone(), TradeType::Buy, None));
                    legs[close] = Some(TradeLeg::new(
                        trades[close].clone(),
                        TradeType::Sell,
                        Some(outcome),
                    ));
                }
                [open] => {
                    legs[open] = Some(TradeLeg::new(trades[open].clone(), TradeType::Buy, None));
                }
                _ => {}
            }
        }
    }

    legs.into_iter().flatten().collect()
}

/// Outcome of closing `open` with `close`.
pub fn round_trip(open: &UnifiedTrade, close: &UnifiedTrade) -> Outcome {
    let matched = open.quantity.min(close.quantity);
    let profit_loss = (close.price - open.price) * matched;
    Outcome {
        profit_loss,
        is_win: profit_loss > 0.0,
        duration: (close.timestamp - open.timestamp).num_minutes(),
    }
}
