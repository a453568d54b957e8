// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Google Gemini generateContent client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::ProviderError;

use super::{ensure_success, http_client, required_key, AiClient, Prompt, ProviderConfig, ProviderKind};

/// Public API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const SAFETY_CATEGORIES: &[&str] = &[
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize, Debug)]
struct Part {
    text: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
    output: Option<String>,
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl Candidate {
    /// Text of the candidate, trying older field names last.
    fn into_text(self) -> Option<String> {
        let from_parts = self
            .content
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text);
        [from_parts, self.output, self.text]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
    }
}

/// Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    key_check_timeout: Duration,
}

impl GeminiClient {
    /// Create a client from provider settings.
    pub fn new(
        config: &ProviderConfig,
        timeout: Duration,
        key_check_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(ProviderKind::Gemini, timeout)?,
            api_key: required_key(config)?,
            model: config.model_or_default().to_string(),
            base_url: config.base_url_or(DEFAULT_BASE_URL),
            key_check_timeout,
        })
    }

    fn request_body(prompt: &Prompt) -> GeminiRequest {
        GeminiRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.combined()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 256,
            },
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|category| json!({"category": category, "threshold": "BLOCK_ONLY_HIGH"}))
                .collect(),
        }
    }
}

#[async_trait]
impl AiClient for GeminiClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    /// List models with the key; a rejected key means the provider is unusable.
    async fn preflight(&self) -> Result<(), ProviderError> {
        let url = format!("{}/v1beta/models", self.base_url);
        debug!(url = %url, "Checking Gemini API key");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .timeout(self.key_check_timeout)
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(ProviderKind::Gemini, &e))?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ProviderError::Unconfigured {
                    provider: ProviderKind::Gemini,
                    reason: format!("API key was rejected (HTTP {})", response.status().as_u16()),
                })
            }
            _ => Ok(()),
        }
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        info!(model = %self.model, "Sending request to Gemini");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::from_transport(ProviderKind::Gemini, &e))?;

        let response = ensure_success(ProviderKind::Gemini, response).await?;
        let body: GeminiResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ResponseUnparseable {
                    provider: ProviderKind::Gemini,
                    message: e.to_string(),
                })?;

        if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::SafetyBlocked {
                provider: ProviderKind::Gemini,
                reason,
            });
        }

        let candidate = body.candidates.into_iter().next().ok_or(
            ProviderError::ResponseUnparseable {
                provider: ProviderKind::Gemini,
                message: "no candidates in response".to_string(),
            },
        )?;

        debug!(finish_reason = ?candidate.finish_reason, "Received Gemini response");
        match candidate.finish_reason.as_deref() {
            Some("MAX_TOKENS") => {
                return Err(ProviderError::Truncated {
                    provider: ProviderKind::Gemini,
                })
            }
            Some(reason @ ("SAFETY" | "RECITATION")) => {
                return Err(ProviderError::SafetyBlocked {
                    provider: ProviderKind::Gemini,
                    reason: reason.to_string(),
                })
            }
            _ => {}
        }

        candidate
            .into_text()
            .ok_or(ProviderError::ResponseUnparseable {
                provider: ProviderKind::Gemini,
                message: "candidate has no text".to_string(),
            })
    }
}
