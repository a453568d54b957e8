// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The provider gateway: strategy selection and graceful degradation.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::analysis::generate_rule_based;
use crate::commit::AiCommitContent;
use crate::config::GatewayLimits;
use crate::error::{GenerationError, ProviderError};

use super::{
    build_prompt, client_for, condense_diff, parse_response, AiClient, Prompt, ProviderConfig,
    ProviderKind,
};

/// One way of producing commit content, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Send the raw diff to the provider.
    Remote(ProviderKind),
    /// Send a condensed summary of the diff to the provider.
    Condensed(ProviderKind),
    /// The rule-based classifier. Always last, never fails.
    RuleBased,
}

/// Remediation offered next to an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvisoryAction {
    OpenSettings,
    SwitchProvider,
    StartLocalService,
}

/// Why a provider result was replaced by the rule-based one.
#[derive(Debug, Clone, PartialEq)]
pub struct Advisory {
    pub cause: ProviderError,
    pub message: String,
    pub action: Option<AdvisoryAction>,
}

impl Advisory {
    /// Advisory for a provider failure. `None` for silent fallbacks.
    pub fn from_error(cause: ProviderError) -> Option<Self> {
        if cause.is_silent() {
            return None;
        }

        let action = match &cause {
            ProviderError::Unconfigured { .. } => Some(AdvisoryAction::OpenSettings),
            ProviderError::ServiceNotRunning { .. } => Some(AdvisoryAction::StartLocalService),
            ProviderError::RequestFailed {
                status: 401 | 403, ..
            } => Some(AdvisoryAction::OpenSettings),
            ProviderError::Unreachable { .. }
            | ProviderError::RateLimited { .. }
            | ProviderError::RequestFailed { .. } => Some(AdvisoryAction::SwitchProvider),
            ProviderError::SafetyBlocked { .. }
            | ProviderError::Truncated { .. }
            | ProviderError::ResponseUnparseable { .. } => None,
        };

        Some(Self {
            message: format!("{}. Showing a rule-based suggestion instead.", cause),
            cause,
            action,
        })
    }
}

/// Where generated content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationSource {
    Provider(ProviderKind),
    Condensed(ProviderKind),
    Rules,
}

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub content: AiCommitContent,
    pub source: GenerationSource,
    pub advisory: Option<Advisory>,
}

/// Strategies for one request, plus any advisory known before running them.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub strategies: Vec<Strategy>,
    pub advisory: Option<Advisory>,
}

impl Plan {
    fn rules_only(advisory: Option<Advisory>) -> Self {
        Self {
            strategies: vec![Strategy::RuleBased],
            advisory,
        }
    }

    fn with_fallback(first: Strategy) -> Self {
        Self {
            strategies: vec![first, Strategy::RuleBased],
            advisory: None,
        }
    }
}

/// A strategy that did not produce content.
enum Fallback {
    /// Skipped without contacting the provider.
    Declined(&'static str),
    Failed(ProviderError),
}

impl From<ProviderError> for Fallback {
    fn from(err: ProviderError) -> Self {
        Fallback::Failed(err)
    }
}

/// Owns the provider settings and runs generation requests.
pub struct Gateway {
    config: ProviderConfig,
    limits: GatewayLimits,
}

impl Gateway {
    pub fn new(config: ProviderConfig, limits: GatewayLimits) -> Self {
        Self { config, limits }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn limits(&self) -> &GatewayLimits {
        &self.limits
    }

    /// Swap in new provider settings, returning the previous ones.
    pub fn replace_config(&mut self, config: ProviderConfig) -> ProviderConfig {
        debug!(provider = %config.provider, "Replacing provider settings");
        std::mem::replace(&mut self.config, config)
    }

    /// Decide which strategies to try for `raw`. Sizes are in bytes.
    pub fn plan(&self, raw: &str) -> Plan {
        let provider = self.config.provider;

        if provider == ProviderKind::Rules {
            return Plan::rules_only(None);
        }
        if !self.config.is_configured() {
            return Plan::rules_only(Advisory::from_error(ProviderError::Unconfigured {
                provider,
                reason: "no API key set".to_string(),
            }));
        }

        if provider == ProviderKind::Gemini {
            return if raw.len() > self.limits.gemini_condense_above {
                Plan::with_fallback(Strategy::Condensed(provider))
            } else {
                Plan::with_fallback(Strategy::Remote(provider))
            };
        }

        match self.limits.max_diff_for(provider) {
            Some(max) if raw.len() > max => {
                debug!(%provider, size = raw.len(), max, "Diff too large for provider");
                Plan::rules_only(None)
            }
            _ => Plan::with_fallback(Strategy::Remote(provider)),
        }
    }

    /// Generate commit content for raw status/diff text.
    ///
    /// Fails only when there is nothing to describe. Every provider failure
    /// degrades to the rule-based result, with an advisory unless silent.
    pub async fn generate(&self, raw: &str) -> Result<Generation, GenerationError> {
        if raw.trim().is_empty() {
            return Err(GenerationError::NoStagedChanges);
        }

        let Plan {
            strategies,
            mut advisory,
        } = self.plan(raw);

        for strategy in strategies {
            let (attempt, source) = match strategy {
                Strategy::RuleBased => break,
                Strategy::Remote(kind) => (
                    self.dispatch(raw, false).await,
                    GenerationSource::Provider(kind),
                ),
                Strategy::Condensed(kind) => {
                    let attempt = match condense_diff(raw, &self.limits) {
                        Some(summary) => self.dispatch(&summary, true).await,
                        None => Err(Fallback::Declined("condensed summary too large")),
                    };
                    (attempt, GenerationSource::Condensed(kind))
                }
            };

            match attempt {
                Ok(content) => {
                    return Ok(Generation {
                        content,
                        source,
                        advisory: None,
                    })
                }
                Err(Fallback::Declined(reason)) => {
                    debug!(?strategy, reason, "Strategy declined");
                }
                Err(Fallback::Failed(err)) => {
                    warn!(?strategy, error = %err, "Provider failed, falling back");
                    advisory = Advisory::from_error(err);
                }
            }
        }

        Ok(Generation {
            content: generate_rule_based(raw),
            source: GenerationSource::Rules,
            advisory,
        })
    }

    async fn dispatch(&self, input: &str, condensed: bool) -> Result<AiCommitContent, Fallback> {
        let client = client_for(
            &self.config,
            Duration::from_secs(self.limits.request_timeout_secs),
            Duration::from_secs(self.limits.key_check_timeout_secs),
        )?
        .ok_or(Fallback::Declined("provider has no client"))?;

        let prompt = build_prompt(input, condensed).map_err(|e| {
            warn!(error = %e, "Could not build prompt");
            Fallback::Declined("prompt rendering failed")
        })?;

        Ok(run_client(client.as_ref(), &prompt).await?)
    }
}

/// Run one client: key check, completion, parsing.
async fn run_client(
    client: &dyn AiClient,
    prompt: &Prompt,
) -> Result<AiCommitContent, ProviderError> {
    client.preflight().await?;
    let text = client.complete(prompt).await?;
    parse_response(client.kind(), &text)
}
