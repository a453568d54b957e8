// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! OpenAI chat completions client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProviderError;

use super::{ensure_success, http_client, required_key, AiClient, Prompt, ProviderConfig, ProviderKind};

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

#[derive(Serialize, Debug)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// OpenAI API client.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(ProviderKind::OpenAi, timeout)?,
            api_key: required_key(config)?,
            model: config.model_or_default().to_string(),
            base_url: config.base_url_or(DEFAULT_BASE_URL),
        })
    }
}

#[async_trait]
impl AiClient for OpenAiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = OpenAiRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &prompt.system,
                },
                Message {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: 0.2,
            max_tokens: 256,
        };

        info!(url = %url, model = %self.model, "Sending request to OpenAI");
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(ProviderKind::OpenAi, &e))?;

        let response = ensure_success(ProviderKind::OpenAi, response).await?;
        let body: OpenAiResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ResponseUnparseable {
                    provider: ProviderKind::OpenAi,
                    message: e.to_string(),
                })?;

        debug!(choices = body.choices.len(), "Received OpenAI response");
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ProviderError::ResponseUnparseable {
                provider: ProviderKind::OpenAi,
                message: "no choices in response".to_string(),
            })
    }
}
