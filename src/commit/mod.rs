// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit module: generated content and message formatting.

mod content;
mod message;

pub use content::AiCommitContent;
pub use message::{format, CommitMessage};
