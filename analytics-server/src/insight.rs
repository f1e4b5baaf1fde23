//! Natural-language insights from a text-generation provider.
//!
//! A [`TradeSummary`] is serialized into a fixed two-message chat prompt.
//! The provider's answer is returned verbatim. There is no retry: a failed
//! call fails the analytics request.

use crate::settings::LlmSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use thiserror::Error;
use trading::{AnnotatedTrade, TradeSummary};
use trading_core::ApiError;

pub const SYSTEM_PROMPT: &str =
    "You are a professional trading analyst. Analyze the provided trading data and generate insights.";

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Text generation API key is not configured")]
    MissingApiKey,

    #[error("Text generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Text generation provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Text generation provider returned no content")]
    EmptyResponse,

    #[error("Failed to encode trade summary: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        ApiError::internal("Failed to generate trading insights", err)
    }
}

/// Generated analysis text and when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub insights: String,
    pub generated_at: DateTime<Utc>,
}

/// A chat-style text generator.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one system instruction and one user message, returns the reply.
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, InsightError>;
}

/// The user message for `summary`.
pub fn user_prompt(summary: &TradeSummary) -> Result<String, InsightError> {
    Ok(format!(
        "Here is my trading data summary: {}. Please provide insights on my trading performance and suggestions for improvement.",
        serde_json::to_string(summary)?
    ))
}

/// Summarizes `trades` and asks `generator` for an analysis.
pub async fn generate_insights(
    generator: &dyn TextGenerator,
    trades: &[AnnotatedTrade],
) -> Result<Insights, InsightError> {
    let summary = TradeSummary::from_trades(trades);
    let prompt = user_prompt(&summary)?;
    debug!("Requesting insights for {} trades", summary.total_trades);

    match generator.generate(SYSTEM_PROMPT, &prompt).await {
        Ok(insights) => Ok(Insights {
            insights,
            generated_at: Utc::now(),
        }),
        Err(e) => {
            error!("Error generating insights: {}", e);
            Err(e)
        }
    }
}

/// Client of an OpenAI-compatible `chat/completions` endpoint (Groq by default).
pub struct ChatCompletionsClient {
    client: Client,
    settings: LlmSettings,
}

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(settings: LlmSettings) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, InsightError> {
        if self.settings.api_key.is_empty() {
            return Err(InsightError::MissingApiKey);
        }

        let payload = json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt },
            ],
        });

        let resp = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(InsightError::Status { status, body });
        }

        let completion: Completion = resp.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(InsightError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl TextGenerator for Recorder {
        async fn generate(&self, system: &str, prompt: &str) -> Result<String, InsightError> {
            self.seen
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok("Cut your losers sooner.".to_string())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextGenerator for Failing {
        async fn generate(&self, _: &str, _: &str) -> Result<String, InsightError> {
            Err(InsightError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn test_prompt_carries_summary_and_reply_is_verbatim() {
        let recorder = Recorder {
            seen: Mutex::new(Vec::new()),
        };

        let insights = generate_insights(&recorder, &[]).await.unwrap();
        assert_eq!(insights.insights, "Cut your losers sooner.");

        let seen = recorder.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, SYSTEM_PROMPT);
        assert!(seen[0].1.starts_with("Here is my trading data summary: {\"totalTrades\":0,"));
        assert!(seen[0].1.ends_with("suggestions for improvement."));
    }

    #[tokio::test]
    async fn test_provider_failure_is_returned() {
        let err = generate_insights(&Failing, &[]).await.unwrap_err();
        assert!(matches!(err, InsightError::EmptyResponse));
        assert_eq!(
            ApiError::from(err).status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let client = ChatCompletionsClient::new(LlmSettings::default()).unwrap();
        let err = client.generate(SYSTEM_PROMPT, "hi").await.unwrap_err();
        assert!(matches!(err, InsightError::MissingApiKey));
    }
}
