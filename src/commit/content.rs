// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The generated commit content shared by every generation path.

use serde::{Deserialize, Serialize};

use super::message::format;

/// A generated commit proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiCommitContent {
    #[serde(rename = "type")]
    pub commit_type: String,
    pub scope: Option<String>,
    pub message: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl AiCommitContent {
    /// Render as a commit header.
    pub fn to_commit_message(&self) -> String {
        format(
            &self.commit_type,
            self.scope.as_deref().unwrap_or_default(),
            &self.message,
        )
    }
}
