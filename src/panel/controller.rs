// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Dispatch of inbound panel events.

use std::path::PathBuf;
use tracing::{debug, warn};

use crate::config::save_provider_settings;
use crate::error::Result;
use crate::git::{GitCommands, GitExecutor, SystemGit};
use crate::provider::{Gateway, ProviderConfig};

use super::protocol::{InboundEvent, OutboundEvent};

/// Connects one panel to the repository and the provider gateway.
///
/// Events are handled one at a time, so at most one generation is in flight.
pub struct PanelController<E: GitExecutor = SystemGit> {
    git: GitCommands<E>,
    gateway: Gateway,
    settings_path: Option<PathBuf>,
}

impl<E: GitExecutor> PanelController<E> {
    /// `settings_path` receives provider updates; `None` keeps them in memory.
    pub fn new(git: GitCommands<E>, gateway: Gateway, settings_path: Option<PathBuf>) -> Self {
        Self {
            git,
            gateway,
            settings_path,
        }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Handle one event and return the events to send back, in order.
    pub async fn handle(&mut self, event: InboundEvent) -> Vec<OutboundEvent> {
        debug!(?event, "Handling panel event");
        match event {
            InboundEvent::Ready => vec![
                OutboundEvent::LoadAiConfig {
                    config: self.gateway.config().clone(),
                },
                self.file_update(),
            ],
            InboundEvent::Refresh => vec![self.file_update()],
            InboundEvent::StageFile { file } => {
                let result = self.git.stage_file(&file);
                self.after_repository_command(result)
            }
            InboundEvent::UnstageFile { file } => {
                let result = self.git.unstage_file(&file);
                self.after_repository_command(result)
            }
            InboundEvent::StageAll => {
                let result = self.git.stage_all();
                self.after_repository_command(result)
            }
            InboundEvent::Commit { message } => match self.git.commit(&message) {
                Ok(summary) => {
                    debug!(summary = %summary, "Committed");
                    vec![OutboundEvent::ClearInputs, self.file_update()]
                }
                Err(e) => vec![OutboundEvent::ShowError {
                    message: e.to_string(),
                }],
            },
            InboundEvent::GenerateAiContent => vec![self.generate().await],
            InboundEvent::UpdateAiConfig { config } => self.update_config(config),
        }
    }

    fn file_update(&self) -> OutboundEvent {
        match self.git.status() {
            Ok(status) => OutboundEvent::UpdateFiles {
                staged: status.staged,
                unstaged: status.unstaged,
            },
            Err(e) => OutboundEvent::ShowError {
                message: e.to_string(),
            },
        }
    }

    fn after_repository_command(&self, result: Result<()>) -> Vec<OutboundEvent> {
        match result {
            Ok(()) => vec![self.file_update()],
            Err(e) => {
                warn!(error = %e, "Repository command failed");
                vec![
                    OutboundEvent::ShowError {
                        message: e.to_string(),
                    },
                    self.file_update(),
                ]
            }
        }
    }

    async fn generate(&self) -> OutboundEvent {
        let raw = match self.git.staged_changes() {
            Ok(changes) => changes.to_signal_text(),
            Err(e) => {
                return OutboundEvent::AiGenerationFailed {
                    error: e.to_string(),
                    action: None,
                }
            }
        };

        match self.gateway.generate(&raw).await {
            Ok(generation) => {
                let (notice, action) = match generation.advisory {
                    Some(advisory) => (Some(advisory.message), advisory.action),
                    None => (None, None),
                };
                OutboundEvent::AiContentGenerated {
                    content: generation.content,
                    notice,
                    action,
                }
            }
            Err(e) => OutboundEvent::AiGenerationFailed {
                error: e.to_string(),
                action: None,
            },
        }
    }

    fn update_config(&mut self, config: ProviderConfig) -> Vec<OutboundEvent> {
        self.gateway.replace_config(config.clone());

        let mut events = Vec::new();
        if let Some(ref path) = self.settings_path {
            if let Err(e) = save_provider_settings(path, &config) {
                warn!(error = %e, "Could not persist provider settings");
                events.push(OutboundEvent::ShowError {
                    message: e.to_string(),
                });
            }
        }
        events.push(OutboundEvent::LoadAiConfig { config });
        events
    }
}
