use anyhow::Context;
use broker_gateway::{Aggregator, GatewayConfig};
use clap::Parser;
use env_logger::Env;
use log::info;
use trading::BrokerType;

/// Fetches trades from the broker services and prints them as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bearer token carrying the broker scopes to read
    #[arg(long)]
    token: String,

    #[arg(long)]
    broker_a_url: Option<String>,

    #[arg(long)]
    broker_b_url: Option<String>,

    /// Restrict the fan-out to these broker codes (brokerA, brokerB)
    #[arg(long, value_delimiter = ',')]
    brokers: Vec<String>,

    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Print unified trades instead of each broker's native shape
    #[arg(long)]
    normalize: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = GatewayConfig {
        timeout_secs: args.timeout_secs,
        ..GatewayConfig::default()
    };
    if let Some(url) = args.broker_a_url {
        config.broker_a.url = url;
    }
    if let Some(url) = args.broker_b_url {
        config.broker_b.url = url;
    }

    let brokers = if args.brokers.is_empty() {
        config.active_brokers()
    } else {
        args.brokers
            .iter()
            .map(|code| code.parse::<BrokerType>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let aggregator = Aggregator::from_config(&config).context("building HTTP client")?;
    let trades = aggregator.fetch_all(&brokers, &args.token).await;
    info!("Fetched {} trades from {} brokers", trades.len(), brokers.len());

    let output = if args.normalize {
        serde_json::to_string_pretty(&trades.normalize())?
    } else {
        serde_json::to_string_pretty(&trades)?
    };
    println!("{}", output);
    Ok(())
}
