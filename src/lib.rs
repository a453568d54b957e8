// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! commitsense - Git panel and conventional commit message inference
//!
//! Reads the staged changes of a repository and suggests a conventional
//! commit message for them.
//!
//! # Features
//!
//! - **Rule-based inference**: keyword and path signals mapped to a commit
//!   type, scope and subject without leaving the machine
//! - **Provider gateway**: optional OpenAI, Anthropic, Gemini or local model
//!   generation that always degrades to the rule-based result
//! - **Panel protocol**: JSON-lines events for driving the same operations
//!   from an editor
//!
//! # Example
//!
//! ```
//! use commitsense::analysis::generate_rule_based;
//!
//! let content = generate_rule_based("file: README.md\n+12 -3\n+ Update the docs\n");
//! assert_eq!(content.commit_type, "docs");
//! assert_eq!(content.to_commit_message(), "docs: update documentation");
//! ```

pub mod analysis;
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod panel;
pub mod provider;

pub use config::CsConfig;
pub use error::{CsError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of commitsense.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}
