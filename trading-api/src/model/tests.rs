use super::broker::BrokerType;
use super::raw_trade::{BrokerTrades, RawTrade, RawTradeA, RawTradeB};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn ts() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 9, 15, 10, 23, 45).unwrap()
}

#[test]
fn test_broker_codes() {
    assert_eq!(BrokerType::BrokerA.code(), "brokerA");
    assert_eq!("brokerB".parse::<BrokerType>().unwrap(), BrokerType::BrokerB);
    assert!("brokerC".parse::<BrokerType>().is_err());
    assert_eq!(serde_json::to_string(&BrokerType::BrokerA).unwrap(), "\"brokerA\"");
}

#[test]
fn test_normalize_broker_a() {
    let raw = RawTradeA::new("A1001", "AAPL", 150.0, 172.35, ts());
    let unified = raw.normalize();

    assert_eq!(unified.id, "A1001");
    assert_eq!(unified.symbol, "AAPL");
    assert_eq!(unified.quantity, 150.0);
    assert_eq!(unified.price, 172.35);
    assert_eq!(unified.timestamp, ts());
    assert_eq!(unified.broker_type, BrokerType::BrokerA);
    assert_eq!(unified.original_data["tradeId"], "A1001");
    assert_eq!(unified.original_data["timestamp"], "2023-09-15T10:23:45Z");
}

#[test]
fn test_equal_trades_differ_only_in_broker_and_original() {
    let a = RawTradeA::new("X1", "BTC", 1.25, 41250.75, ts()).normalize();
    let b = RawTradeB::new("X1", "BTC", 1.25, 41250.75, ts()).normalize();

    assert_ne!(a.broker_type, b.broker_type);
    assert_ne!(a.original_data, b.original_data);

    let mut b_as_a = b.clone();
    b_as_a.broker_type = a.broker_type;
    b_as_a.original_data = a.original_data.clone();
    assert_eq!(a, b_as_a);
}

#[test]
fn test_raw_trade_wire_format() {
    let raw: RawTradeB = serde_json::from_value(json!({
        "_id": "65f0c1",
        "orderId": "B2001",
        "asset": "BTC",
        "amount": 1.25,
        "cost": 41250.75,
        "executedAt": "2023-09-15T09:30:15.000Z",
        "userId": "u1"
    }))
    .unwrap();

    assert_eq!(raw.order_id, "B2001");
    assert_eq!(raw.executed_at, Utc.with_ymd_and_hms(2023, 9, 15, 9, 30, 15).unwrap());
}

#[test]
fn test_broker_trades_normalize_all() {
    let trades = BrokerTrades {
        broker_a: vec![RawTradeA::new("A1", "AAPL", 1.0, 1.0, ts())],
        broker_b: vec![
            RawTradeB::new("B1", "ETH", 1.0, 1.0, ts()),
            RawTradeB::new("B2", "SOL", 1.0, 1.0, ts()),
        ],
    };

    let unified = trades.normalize();
    assert_eq!(unified.len(), 3);
    assert_eq!(trades.count(BrokerType::BrokerB), 2);
    assert_eq!(unified[0].broker_type, BrokerType::BrokerA);

    let json = serde_json::to_value(&trades).unwrap();
    assert!(json.get("brokerA").is_some());
    assert!(json.get("brokerB").is_some());
}

#[test]
fn test_payload_sanitized() {
    let payload = json!({
        "tradeId": "  A2000 ",
        "symbol": " aapl",
        "quantity": 10,
        "price": 150.756,
        "timestamp": "2023-09-15T10:23:45.000Z"
    });

    let trade = RawTradeA::from_payload(&payload, Utc::now()).unwrap();
    assert_eq!(trade.trade_id, "A2000");
    assert_eq!(trade.symbol, "AAPL");
    assert_eq!(trade.price, 150.76);
    assert_eq!(trade.timestamp, ts());
}

#[test]
fn test_payload_timestamp_defaults_to_now() {
    let payload = json!({"orderId": "B1", "asset": "eth", "amount": 2.0, "cost": 2500.3});

    let trade = RawTradeB::from_payload(&payload, ts()).unwrap();
    assert_eq!(trade.executed_at, ts());
    assert_eq!(trade.asset, "ETH");
}

#[test]
fn test_payload_reports_every_bad_field() {
    let payload = json!({
        "orderId": "",
        "amount": -3,
        "cost": "cheap",
        "executedAt": "yesterday"
    });

    let err = RawTradeB::from_payload(&payload, ts()).unwrap_err();
    assert_eq!(err.errors().len(), 5);
    assert!(err.has("orderId"));
    assert!(err.has("asset"));
    assert!(err.has("amount"));
    assert!(err.has("cost"));
    assert!(err.has("executedAt"));
}

#[test]
fn test_payload_must_be_object() {
    let err = RawTradeA::from_payload(&json!([1, 2]), ts()).unwrap_err();
    assert_eq!(err.errors()[0].message, "Expected a JSON object");
}

#[test]
fn test_price_rounding_to_zero_is_rejected() {
    let payload = json!({"tradeId": "A1", "symbol": "AAPL", "quantity": 1, "price": 0.004});
    let err = RawTradeA::from_payload(&payload, ts()).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].path, "price");
    assert_eq!(err.errors()[0].message, "Number must be at least 0.01");

    let payload = json!({"orderId": "B1", "asset": "BTC", "amount": 1, "cost": 0.006});
    let trade = RawTradeB::from_payload(&payload, ts()).unwrap();
    assert_eq!(trade.cost, 0.01);
}
