use chrono::{DateTime, Utc};
use trading::RawTradeB;

const SEED: [(&str, &str, f64, f64, &str); 10] = [
    ("B2001", "BTC", 1.25, 41250.75, "2023-09-15T09:30:15Z"),
    ("B2002", "ETH", 8.5, 2295.40, "2023-09-15T12:45:33Z"),
    ("B2003", "SOL", 45.0, 108.25, "2023-09-16T08:15:22Z"),
    ("B2004", "ADA", 1500.0, 0.45, "2023-09-16T15:10:45Z"),
    ("B2005", "BTC", 0.75, 42300.80, "2023-09-17T11:23:18Z"),
    ("B2006", "DOT", 120.0, 5.75, "2023-09-17T14:40:27Z"),
    ("B2007", "ETH", 4.2, 2320.15, "2023-09-18T10:05:55Z"),
    ("B2008", "AVAX", 35.0, 28.40, "2023-09-18T16:35:12Z"),
    ("B2009", "SOL", 65.0, 112.80, "2023-09-19T09:50:33Z"),
    ("B2010", "BTC", 2.1, 41800.25, "2023-09-19T15:25:47Z"),
];

/// Orders the ledger starts with.
pub fn seed_trades() -> Vec<RawTradeB> {
    SEED.iter()
        .filter_map(|(id, asset, amount, cost, ts)| {
            let ts: DateTime<Utc> = ts.parse().ok()?;
            Some(RawTradeB::new(*id, *asset, *amount, *cost, ts))
        })
        .collect()
}

/// Fixed examples served by the `/sample` route.
pub fn sample_trades(now: DateTime<Utc>) -> Vec<RawTradeB> {
    vec![
        RawTradeB::new("B54321", "BTC", 2.5, 45000.75, now),
        RawTradeB::new("B54322", "ETH", 10.0, 2500.30, now),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_complete() {
        let trades = seed_trades();
        assert_eq!(trades.len(), SEED.len());
        assert_eq!(trades[4].asset, "BTC");
        assert_eq!(trades[4].amount, 0.75);
    }
}
