// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Anthropic messages API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProviderError;

use super::{ensure_success, http_client, required_key, AiClient, Prompt, ProviderConfig, ProviderKind};

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

const API_VERSION: &str = "2023-06-01";

#[derive(Serialize, Debug)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize, Debug)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize, Debug)]
struct ContentBlock {
    text: Option<String>,
}

/// Anthropic API client.
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl AnthropicClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(ProviderKind::Anthropic, timeout)?,
            api_key: required_key(config)?,
            model: config.model_or_default().to_string(),
            base_url: config.base_url_or(DEFAULT_BASE_URL),
        })
    }
}

#[async_trait]
impl AiClient for AnthropicClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.base_url);
        // The system prompt travels inside the single user turn.
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: 256,
            messages: vec![Message {
                role: "user",
                content: prompt.combined(),
            }],
        };

        info!(url = %url, model = %self.model, "Sending request to Anthropic");
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(ProviderKind::Anthropic, &e))?;

        let response = ensure_success(ProviderKind::Anthropic, response).await?;
        let body: AnthropicResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ResponseUnparseable {
                    provider: ProviderKind::Anthropic,
                    message: e.to_string(),
                })?;

        debug!(blocks = body.content.len(), "Received Anthropic response");
        body.content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::ResponseUnparseable {
                provider: ProviderKind::Anthropic,
                message: "no text content in response".to_string(),
            })
    }
}
