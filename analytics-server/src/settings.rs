use broker_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use trading_core::config::RunEnvironment;
use trading_core::DEFAULT_JWT_SECRET;

/// Settings of the analytics server.
///
/// Loaded through `trading_core::config::load_settings` with the
/// `ANALYTICS` prefix, e.g. `ANALYTICS__LLM__API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub port: u16,
    pub environment: RunEnvironment,
    pub jwt_secret: String,
    pub brokers: GatewayConfig,
    /// Postgres connection string. Trades and users stay in memory without it.
    pub database_url: Option<String>,
    pub llm: LlmSettings,
    pub bcrypt_cost: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 3000,
            environment: RunEnvironment::default(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            brokers: GatewayConfig::default(),
            database_url: None,
            llm: LlmSettings::default(),
            bcrypt_cost: 10,
        }
    }
}

/// OpenAI-compatible chat completion endpoint used for insights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: String::new(),
            model: "llama3-70b-8192".to_string(),
            temperature: 0.5,
            timeout_secs: 60,
        }
    }
}
