use analytics_server::insight::ChatCompletionsClient;
use analytics_server::store::{MemoryStore, PgStore, TradeStore, UserStore};
use analytics_server::{router, AppState, Settings};
use broker_gateway::Aggregator;
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use trading_core::args::ServiceArgs;
use trading_core::config::load_settings;
use trading_core::{server, AuthKeys, DEFAULT_JWT_SECRET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("=== Analytics Server Starting ===");

    // 1. Settings
    let args = ServiceArgs::parse();
    let mut settings: Settings = load_settings("analytics", "ANALYTICS", &args, &Settings::default())?;
    if let Some(port) = args.port() {
        settings.port = port;
    }
    // Conventional variable names are honoured when the prefixed ones are unset.
    if settings.llm.api_key.is_empty() {
        settings.llm.api_key = std::env::var("GROQ_API_KEY").unwrap_or_default();
    }
    if settings.database_url.is_none() {
        settings.database_url = std::env::var("DATABASE_URL").ok();
    }
    if settings.jwt_secret == DEFAULT_JWT_SECRET {
        warn!("Using the default JWT secret; set ANALYTICS__JWT_SECRET");
    }

    // 2. Storage
    let (trades, users): (Arc<dyn TradeStore>, Arc<dyn UserStore>) = match &settings.database_url {
        Some(url) => {
            info!("Connecting to Postgres");
            let store = Arc::new(PgStore::connect(url).await?);
            (store.clone() as Arc<dyn TradeStore>, store as Arc<dyn UserStore>)
        }
        None => {
            warn!("No database configured; trades and users are kept in memory");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as Arc<dyn TradeStore>, store as Arc<dyn UserStore>)
        }
    };

    // 3. Brokers and insights
    for broker in settings.brokers.active_brokers() {
        let endpoint = settings.brokers.endpoint(broker);
        info!("{} ({}) at {}", endpoint.name, broker, endpoint.url);
    }
    let aggregator = Aggregator::from_config(&settings.brokers)?;
    let insights = Arc::new(ChatCompletionsClient::new(settings.llm.clone())?);

    let state = AppState {
        keys: AuthKeys::new(&settings.jwt_secret),
        aggregator,
        brokers: settings.brokers.clone(),
        trades,
        users,
        insights,
        bcrypt_cost: settings.bcrypt_cost,
        environment: settings.environment,
    };

    server::serve("Analytics Server", router(state), settings.port).await
}
