use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use super::base::{Completion, Provider};
use super::configs::GeminiProviderConfig;
use super::utils::{error_body_message, gemini_response_to_text, get_usage, prompt_to_gemini_spec};
use crate::errors::ProviderError;

pub struct GeminiProvider {
    client: Client,
    config: GeminiProviderConfig,
}

impl GeminiProvider {
    pub fn new(config: GeminiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    async fn post(&self, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.host.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(ProviderError::Server(status))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(ProviderError::RequestFailed {
                    status,
                    body: error_body_message(&body),
                })
            }
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<Completion, ProviderError> {
        let payload = prompt_to_gemini_spec(prompt, &self.config);
        let response = self.post(payload).await?;

        let text = gemini_response_to_text(&response)?;
        let usage = get_usage(&response);
        tracing::debug!(
            model = %self.config.model,
            input_tokens = ?usage.input_tokens,
            output_tokens = ?usage.output_tokens,
            "generation complete"
        );

        Ok(Completion::new(text, usage))
    }
}
