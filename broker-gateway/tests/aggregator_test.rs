use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use broker_gateway::{
    Aggregator, BrokerAdapter, BrokerEndpoint, BrokerError, GatewayConfig, HttpBrokerAdapter,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use trading::{BrokerType, RawTradeA, RawTradeB};

fn ts(s: &str) -> chrono::DateTime<chrono::Utc> {
    s.parse().unwrap()
}

fn broker_b_trades() -> Vec<RawTradeB> {
    vec![
        RawTradeB::new("B1", "TSLA", 3.0, 200.0, ts("2023-04-01T10:00:00Z")),
        RawTradeB::new("B2", "TSLA", 3.0, 210.0, ts("2023-04-01T10:30:00Z")),
    ]
}

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A local address nothing listens on.
async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/trades/broker-a", addr)
}

fn broker_b_router() -> Router {
    Router::new().route(
        "/api/trades/broker-b",
        get(|headers: HeaderMap| async move {
            match headers.get("authorization").and_then(|v| v.to_str().ok()) {
                Some("Bearer good-token") => Ok(Json(broker_b_trades())),
                _ => Err(StatusCode::UNAUTHORIZED),
            }
        }),
    )
}

fn config(broker_a_url: String, broker_b_url: String) -> GatewayConfig {
    GatewayConfig {
        broker_a: BrokerEndpoint {
            name: "Broker A".into(),
            url: broker_a_url,
            active: true,
        },
        broker_b: BrokerEndpoint {
            name: "Broker B".into(),
            url: broker_b_url,
            active: true,
        },
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn test_unreachable_broker_yields_empty_list() {
    let base = spawn(broker_b_router()).await;
    let aggregator = Aggregator::from_config(&config(
        closed_port_url().await,
        format!("{}/api/trades/broker-b", base),
    ))
    .unwrap();

    let trades = aggregator
        .fetch_all(&BrokerType::ALL, "good-token")
        .await;

    assert!(trades.broker_a.is_empty());
    assert_eq!(trades.broker_b, broker_b_trades());
}

#[tokio::test]
async fn test_non_success_status_yields_empty_list() {
    let base = spawn(broker_b_router()).await;
    let aggregator = Aggregator::from_config(&config(
        closed_port_url().await,
        format!("{}/api/trades/broker-b", base),
    ))
    .unwrap();

    let trades = aggregator.fetch_all(&BrokerType::ALL, "bad-token").await;
    assert!(trades.is_empty());
}

#[tokio::test]
async fn test_adapter_reports_status() {
    let base = spawn(broker_b_router()).await;
    let adapter = HttpBrokerAdapter::<RawTradeB>::new(
        reqwest::Client::new(),
        format!("{}/api/trades/broker-b", base),
    );

    match adapter.fetch("bad-token").await {
        Err(BrokerError::Status(code)) => assert_eq!(code, 401),
        other => panic!("expected status error, got {:?}", other.map(|t| t.len())),
    }
}

#[tokio::test]
async fn test_undecodable_body_yields_empty_list() {
    let router = Router::new().route(
        "/api/trades/broker-b",
        get(|| async { Json(serde_json::json!({"unexpected": true})) }),
    );
    let base = spawn(router).await;
    let aggregator = Aggregator::new().with_broker_b(Arc::new(HttpBrokerAdapter::<RawTradeB>::new(
        reqwest::Client::new(),
        format!("{}/api/trades/broker-b", base),
    )));

    let trades = aggregator.fetch_all(&[BrokerType::BrokerB], "any").await;
    assert!(trades.broker_b.is_empty());
}

struct CountingAdapter {
    calls: AtomicUsize,
    trades: Vec<RawTradeA>,
}

#[async_trait]
impl BrokerAdapter<RawTradeA> for CountingAdapter {
    async fn fetch(&self, _token: &str) -> Result<Vec<RawTradeA>, BrokerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.trades.clone())
    }
}

#[tokio::test]
async fn test_only_authorized_brokers_are_called() {
    let adapter = Arc::new(CountingAdapter {
        calls: AtomicUsize::new(0),
        trades: vec![RawTradeA::new("A1", "AAPL", 1.0, 10.0, ts("2023-04-01T10:00:00Z"))],
    });
    let aggregator = Aggregator::new().with_broker_a(adapter.clone());

    let trades = aggregator.fetch_all(&[BrokerType::BrokerB], "t").await;
    assert!(trades.is_empty());
    assert_eq!(adapter.calls.load(Ordering::SeqCst), 0);

    let trades = aggregator.fetch_all(&[BrokerType::BrokerA], "t").await;
    assert_eq!(trades.count(BrokerType::BrokerA), 1);
    assert_eq!(adapter.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_inactive_brokers_are_not_offered() {
    let mut config = GatewayConfig::default();
    assert_eq!(config.active_brokers(), BrokerType::ALL.to_vec());

    config.broker_a.active = false;
    assert_eq!(config.active_brokers(), vec![BrokerType::BrokerB]);
    assert_eq!(config.endpoint(BrokerType::BrokerB).name, "Broker B");
}

/// Returns its trades only once every adapter sharing `barrier` has started.
struct RendezvousAdapter<T> {
    barrier: Arc<tokio::sync::Barrier>,
    trades: Vec<T>,
}

#[async_trait]
impl<T: trading::RawTrade> BrokerAdapter<T> for RendezvousAdapter<T> {
    async fn fetch(&self, _token: &str) -> Result<Vec<T>, BrokerError> {
        self.barrier.wait().await;
        Ok(self.trades.clone())
    }
}

#[tokio::test]
async fn test_brokers_are_fetched_concurrently() {
    let barrier = Arc::new(tokio::sync::Barrier::new(2));
    let aggregator = Aggregator::new()
        .with_broker_a(Arc::new(RendezvousAdapter {
            barrier: barrier.clone(),
            trades: vec![RawTradeA::new("A1", "AAPL", 1.0, 10.0, ts("2023-04-01T10:00:00Z"))],
        }))
        .with_broker_b(Arc::new(RendezvousAdapter {
            barrier,
            trades: broker_b_trades(),
        }));

    // a sequential fan-out would block forever in the first adapter
    let trades = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        aggregator.fetch_all(&BrokerType::ALL, "t"),
    )
    .await
    .expect("broker fetches did not overlap");

    assert_eq!(trades.count(BrokerType::BrokerA), 1);
    assert_eq!(trades.count(BrokerType::BrokerB), 2);
}
