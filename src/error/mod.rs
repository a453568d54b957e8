// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for commitsense.
//!
//! Repository failures are surfaced to the user. Provider failures are
//! recoverable: the gateway turns them into advisories and falls back to the
//! rule-based classifier. The only hard stop during generation is an empty
//! staged diff.

use std::path::PathBuf;
use thiserror::Error;

use crate::provider::ProviderKind;

/// The main error type for commitsense operations.
#[derive(Error, Debug)]
pub enum CsError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // Provider errors (only escape the gateway when a client is used directly)
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // Generation errors
    #[error("{0}")]
    Generation(#[from] GenerationError),

    // Commit errors
    #[error("Commit error: {0}")]
    Commit(#[from] CommitError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Protocol frames
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // UI/Interactive errors
    #[error("UI error: {0}")]
    Ui(String),

    // User cancelled operation
    #[error("Operation cancelled by user")]
    Cancelled,

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl From<dialoguer::Error> for CsError {
    fn from(err: dialoguer::Error) -> Self {
        CsError::Ui(err.to_string())
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Failed to write configuration to {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("No staged changes found")]
    NoStagedChanges,

    /// A repository command (stage, unstage, commit, diff, status) failed.
    #[error("git {command} failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::OpenFailed {
            message: err.message().to_string(),
        }
    }
}

/// Hard stops of the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("No staged changes to describe. Stage some files first.")]
    NoStagedChanges,
}

/// Failures of a single remote provider call.
///
/// None of these escape [`crate::provider::Gateway::generate`]; each becomes an
/// [`crate::provider::Advisory`] next to the rule-based result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider} is not configured: {reason}")]
    Unconfigured {
        provider: ProviderKind,
        reason: String,
    },

    #[error("{provider} could not be reached: {message}")]
    Unreachable {
        provider: ProviderKind,
        message: String,
    },

    #[error("local model service is not running at {endpoint}")]
    ServiceNotRunning { endpoint: String },

    #[error("{provider} rate limit or quota exceeded")]
    RateLimited { provider: ProviderKind },

    #[error("{provider} blocked the response: {reason}")]
    SafetyBlocked {
        provider: ProviderKind,
        reason: String,
    },

    #[error("{provider} response was cut off by the token limit")]
    Truncated { provider: ProviderKind },

    #[error("{provider} returned HTTP {status}: {message}")]
    RequestFailed {
        provider: ProviderKind,
        status: u16,
        message: String,
    },

    #[error("{provider} returned a response without usable text: {message}")]
    ResponseUnparseable {
        provider: ProviderKind,
        message: String,
    },
}

impl ProviderError {
    /// Whether the fallback should happen without telling the user.
    ///
    /// Gemini quota exhaustion and token truncation are routine enough that
    /// the rule-based result is shown silently.
    pub fn is_silent(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited {
                provider: ProviderKind::Gemini
            } | ProviderError::Truncated {
                provider: ProviderKind::Gemini
            }
        )
    }

    /// Map a transport error from reqwest.
    pub fn from_transport(provider: ProviderKind, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        ProviderError::Unreachable { provider, message }
    }
}

/// Commit-related errors.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to parse commit message: {message}")]
    ParseFailed { message: String },

    #[error("Empty commit message")]
    EmptyMessage,

    #[error("Invalid conventional commit format")]
    InvalidConventionalFormat,
}

/// Result type alias for commitsense operations.
pub type Result<T> = std::result::Result<T, CsError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CsError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}
