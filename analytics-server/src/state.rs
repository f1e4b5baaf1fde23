use crate::insight::TextGenerator;
use crate::store::{TradeStore, UserStore};
use broker_gateway::{Aggregator, GatewayConfig};
use std::sync::Arc;
use trading_core::config::RunEnvironment;
use trading_core::AuthKeys;

/// Everything a handler may need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub keys: AuthKeys,
    pub aggregator: Aggregator,
    pub brokers: GatewayConfig,
    pub trades: Arc<dyn TradeStore>,
    pub users: Arc<dyn UserStore>,
    pub insights: Arc<dyn TextGenerator>,
    pub bcrypt_cost: u32,
    /// Development exposes internal error detail.
    pub environment: RunEnvironment,
}
