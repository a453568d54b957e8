// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Panel message protocol: JSON objects tagged by `type`.

use serde::{Deserialize, Serialize};

use crate::commit::AiCommitContent;
use crate::git::FileEntry;
use crate::provider::{AdvisoryAction, ProviderConfig};

/// Events sent by the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundEvent {
    Commit {
        message: String,
    },
    StageFile {
        file: String,
    },
    UnstageFile {
        file: String,
    },
    Refresh,
    StageAll,
    Ready,
    #[serde(rename = "generateAIContent")]
    GenerateAiContent,
    #[serde(rename = "updateAIConfig")]
    UpdateAiConfig {
        config: ProviderConfig,
    },
}

/// Events sent to the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundEvent {
    UpdateFiles {
        staged: Vec<FileEntry>,
        unstaged: Vec<FileEntry>,
    },
    ClearInputs,
    AiContentGenerated {
        content: AiCommitContent,
        /// Why a fallback happened, if it did.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<AdvisoryAction>,
    },
    AiGenerationFailed {
        error: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<AdvisoryAction>,
    },
    #[serde(rename = "loadAIConfig")]
    LoadAiConfig {
        config: ProviderConfig,
    },
    ShowError {
        message: String,
    },
}
