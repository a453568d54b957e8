// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Client for a locally hosted model service (Ollama-compatible).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::ProviderError;

use super::{ensure_success, http_client, AiClient, Prompt, ProviderConfig, ProviderKind};

#[derive(Serialize, Debug)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    response: Option<String>,
    text: Option<String>,
    content: Option<String>,
}

/// Local model client. Needs no credentials.
pub struct LocalClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl LocalClient {
    /// Create a client from provider settings.
    pub fn new(config: &ProviderConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(ProviderKind::Local, timeout)?,
            endpoint: config.local_endpoint().to_string(),
            model: config.model_or_default().to_string(),
        })
    }
}

#[async_trait]
impl AiClient for LocalClient {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, ProviderError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: prompt.combined(),
            stream: false,
        };

        info!(endpoint = %self.endpoint, model = %self.model, "Sending request to local model");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ServiceNotRunning {
                        endpoint: self.endpoint.clone(),
                    }
                } else {
                    ProviderError::from_transport(ProviderKind::Local, &e)
                }
            })?;

        let response = ensure_success(ProviderKind::Local, response).await?;
        let body: GenerateResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ResponseUnparseable {
                    provider: ProviderKind::Local,
                    message: e.to_string(),
                })?;

        [body.response, body.text, body.content]
            .into_iter()
            .flatten()
            .find(|t| !t.trim().is_empty())
            .ok_or(ProviderError::ResponseUnparseable {
                provider: ProviderKind::Local,
                message: "no response text".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prompt() -> Prompt {
        Prompt {
            system: "sys".to_string(),
            user: "diff".to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_shape() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(serde_json::json!({
                "model": "llama3.2",
                "prompt": "sys\n\ndiff",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "",
                "content": "chore: bump"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ProviderConfig::new(ProviderKind::Local)
            .with_endpoint(format!("{}/api/generate", server.uri()));
        let client = LocalClient::new(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(client.complete(&prompt()).await.unwrap(), "chore: bump");
    }

    #[tokio::test]
    async fn test_connection_refused_is_service_not_running() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}/api/generate", listener.local_addr().unwrap());
        drop(listener);

        let config = ProviderConfig::new(ProviderKind::Local).with_endpoint(endpoint.clone());
        let client = LocalClient::new(&config, Duration::from_secs(5)).unwrap();
        let err = client.complete(&prompt()).await.unwrap_err();
        assert_eq!(err, ProviderError::ServiceNotRunning { endpoint });
    }
}
