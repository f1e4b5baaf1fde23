use chrono::{DateTime, Utc};
use trading::RawTradeA;

const SEED: [(&str, &str, f64, f64, &str); 10] = [
    ("A1001", "AAPL", 150.0, 172.35, "2023-09-15T10:23:45Z"),
    ("A1002", "MSFT", 80.0, 315.75, "2023-09-15T11:15:22Z"),
    ("A1003", "GOOGL", 25.0, 140.32, "2023-09-16T09:45:30Z"),
    ("A1004", "AMZN", 40.0, 136.80, "2023-09-16T14:22:18Z"),
    ("A1005", "TSLA", 60.0, 243.50, "2023-09-17T10:05:12Z"),
    ("A1006", "AAPL", 100.0, 173.75, "2023-09-17T15:34:27Z"),
    ("A1007", "NVDA", 45.0, 425.80, "2023-09-18T09:12:33Z"),
    ("A1008", "META", 70.0, 305.25, "2023-09-18T13:45:51Z"),
    ("A1009", "MSFT", 120.0, 318.40, "2023-09-19T11:02:15Z"),
    ("A1010", "GOOGL", 55.0, 142.70, "2023-09-19T16:18:42Z"),
];

/// Trades the ledger starts with.
pub fn seed_trades() -> Vec<RawTradeA> {
    SEED.iter()
        .filter_map(|(id, symbol, qty, price, ts)| {
            let ts: DateTime<Utc> = ts.parse().ok()?;
            Some(RawTradeA::new(*id, *symbol, *qty, *price, ts))
        })
        .collect()
}

/// Fixed examples served by the `/sample` route.
pub fn sample_trades(now: DateTime<Utc>) -> Vec<RawTradeA> {
    vec![
        RawTradeA::new("A12345", "AAPL", 100.0, 150.75, now),
        RawTradeA::new("A12346", "MSFT", 50.0, 290.50, now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_complete() {
        let trades = seed_trades();
        assert_eq!(trades.len(), SEED.len());
        assert_eq!(trades[0].trade_id, "A1001");
        assert_eq!(trades[9].symbol, "GOOGL");
    }
}
