mod seed;

use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use trading::{BrokerType, RawTrade, RawTradeA};
use trading_core::args::ServiceArgs;
use trading_core::auth::AuthKeys;
use trading_core::broker_service::{broker_router, BrokerLedger, BrokerServiceConfig, BrokerServiceState};
use trading_core::config::load_settings;
use trading_core::{server, DEFAULT_JWT_SECRET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== Broker A Starting ===");

    let args = ServiceArgs::parse();
    let defaults = BrokerServiceConfig::for_broker(BrokerType::BrokerA);
    let mut config: BrokerServiceConfig = load_settings("broker-a", "BROKER_A", &args, &defaults)?;
    if let Some(port) = args.port() {
        config.port = port;
    }
    if config.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the development JWT secret; set BROKER_A__JWT_SECRET");
    }

    let seed = if config.seed { seed::seed_trades() } else { Vec::new() };
    let ledger = Arc::new(BrokerLedger::new(seed));
    info!("Ledger ready with {} trades", ledger.len().await);

    let state = BrokerServiceState::new(ledger, AuthKeys::new(&config.jwt_secret), seed::sample_trades)
        .with_environment(config.environment);
    let app = broker_router::<RawTradeA>(state);

    server::serve(
        &format!("Broker A ({})", RawTradeA::BROKER),
        app,
        config.port,
    )
    .await
}
