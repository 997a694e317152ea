use std::time::Duration;

use async_trait::async_trait;
use replyline_core::config::LlmConfig;
use replyline_core::PipelineError;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::llm::{ChatMessage, LlmClient};

/// Chat-completions client for OpenRouter-compatible endpoints.
pub struct OpenRouterClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    temperature: f32,
}

impl OpenRouterClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(config.timeout_secs)).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
        })
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, PipelineError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| PipelineError::ModelCall("llm api key is not configured".to_owned()))?;

        let request = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages,
        };

        let response = self
            .http
            .post(&self.base_url)
            .bearer_auth(api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| PipelineError::ModelCall(format!("model request failed: {err}")))?
            .error_for_status()
            .map_err(|err| {
                PipelineError::ModelCall(format!("model returned an error status: {err}"))
            })?;

        let body: ChatCompletionResponse = response.json().await.map_err(|err| {
            PipelineError::ModelCall(format!("model response body was unreadable: {err}"))
        })?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::ModelCall("model returned no choices".to_owned()))?
            .message
            .content
            .unwrap_or_default();

        let content = content.trim();
        if content.is_empty() {
            return Err(PipelineError::ModelCall("model returned empty content".to_owned()));
        }

        Ok(content.to_owned())
    }
}
