// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Provider gateway module.
//!
//! Delegates commit generation to a remote or local text-generation
//! service and degrades to the rule-based classifier whenever that fails.
//! Each backend implements [`AiClient`]; the [`Gateway`] decides which one
//! runs, with which input, and turns every failure into an [`Advisory`].

mod anthropic;
mod condense;
mod gateway;
mod gemini;
mod local;
mod openai;
mod prompt;
mod response;

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ProviderError;

pub use crate::config::{ProviderConfig, ProviderKind};
pub use anthropic::AnthropicClient;
pub use condense::condense_diff;
pub use gateway::{
    Advisory, AdvisoryAction, Gateway, Generation, GenerationSource, Plan, Strategy,
};
pub use gemini::GeminiClient;
pub use local::LocalClient;
pub use openai::OpenAiClient;
pub use prompt::{build_prompt, Prompt};
pub use response::parse_response;

/// Longest slice of an error body kept in a [`ProviderError`].
const ERROR_BODY_LIMIT: usize = 200;

/// A text-generation backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiClient: Send + Sync {
    /// The provider this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Cheap credential check before a generation request.
    async fn preflight(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    /// Send the prompt and return the raw completion text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError>;
}

/// Build the client for the configured provider. `None` for `rules`.
pub fn client_for(
    config: &ProviderConfig,
    request_timeout: Duration,
    key_check_timeout: Duration,
) -> Result<Option<Box<dyn AiClient>>, ProviderError> {
    let client: Box<dyn AiClient> = match config.provider {
        ProviderKind::OpenAi => Box::new(OpenAiClient::new(config, request_timeout)?),
        ProviderKind::Anthropic => Box::new(AnthropicClient::new(config, request_timeout)?),
        ProviderKind::Gemini => Box::new(GeminiClient::new(
            config,
            request_timeout,
            key_check_timeout,
        )?),
        ProviderKind::Local => Box::new(LocalClient::new(config, request_timeout)?),
        ProviderKind::Rules => return Ok(None),
    };
    Ok(Some(client))
}

fn http_client(provider: ProviderKind, timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::from_transport(provider, &e))
}

fn required_key(config: &ProviderConfig) -> Result<String, ProviderError> {
    config
        .api_key()
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Unconfigured {
            provider: config.provider,
            reason: "no API key set".to_string(),
        })
}

/// Map a non-success response to a provider error.
async fn ensure_success(
    provider: ProviderKind,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited { provider });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::RequestFailed {
        provider,
        status: status.as_u16(),
        message: truncate_chars(body.trim(), ERROR_BODY_LIMIT),
    })
}

/// Truncate on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
