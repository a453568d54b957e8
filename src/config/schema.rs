// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from commitsense.toml.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default endpoint of a locally hosted model service.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// The main configuration structure for commitsense.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct CsConfig {
    /// Text-generation provider settings.
    pub ai: ProviderConfig,

    /// Size thresholds and timeouts of the provider gateway.
    pub limits: GatewayLimits,

    /// UI/UX configuration.
    pub ui: UiConfig,
}

impl CsConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Available text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Gemini,
    Local,
    #[default]
    Rules,
}

impl ProviderKind {
    /// Get the settings identifier of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Local => "local",
            ProviderKind::Rules => "rules",
        }
    }

    /// Human readable name for notices.
    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OpenAI",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Local => "Local model",
            ProviderKind::Rules => "Rule engine",
        }
    }

    /// Whether the provider needs an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            ProviderKind::OpenAi | ProviderKind::Anthropic | ProviderKind::Gemini
        )
    }

    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Local => "llama3.2",
            ProviderKind::Rules => "rules",
        }
    }

    /// Get all providers.
    pub fn all() -> &'static [ProviderKind] {
        &[
            ProviderKind::OpenAi,
            ProviderKind::Anthropic,
            ProviderKind::Gemini,
            ProviderKind::Local,
            ProviderKind::Rules,
        ]
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "local" | "ollama" => Ok(ProviderKind::Local),
            "rules" | "rule" => Ok(ProviderKind::Rules),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Provider selection and credentials.
///
/// Owned by the gateway and replaced wholesale on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Selected provider.
    pub provider: ProviderKind,

    /// API key for cloud providers.
    #[serde(alias = "api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Endpoint override. For `local` this is the full generate URL, for
    /// cloud providers it replaces the API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ProviderConfig {
    /// Create a config for a provider with no credentials.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            ..Self::default()
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// `rules` and `local` are always usable; cloud providers need a key.
    pub fn is_configured(&self) -> bool {
        if self.provider.requires_api_key() {
            self.api_key
                .as_deref()
                .map(|k| !k.trim().is_empty())
                .unwrap_or(false)
        } else {
            true
        }
    }

    /// Effective model name.
    pub fn model_or_default(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Effective local endpoint.
    pub fn local_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(DEFAULT_LOCAL_ENDPOINT)
    }

    /// API key with whitespace trimmed, empty treated as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Endpoint override for cloud providers.
    pub fn base_url_or(&self, default: &str) -> String {
        let base = self
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(default);
        base.trim_end_matches('/').to_string()
    }
}

/// Size thresholds and timeouts of the provider gateway.
///
/// The numbers are tuned against provider token limits rather than derived,
/// so they are configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GatewayLimits {
    /// Timeout of a generation request in seconds.
    pub request_timeout_secs: u64,

    /// Timeout of the Gemini API key check in seconds.
    pub key_check_timeout_secs: u64,

    /// Largest diff (bytes) sent to OpenAI.
    pub openai_max_diff: usize,

    /// Largest diff (bytes) sent to Anthropic.
    pub anthropic_max_diff: usize,

    /// Largest diff (bytes) sent to a local model.
    pub local_max_diff: usize,

    /// Gemini diffs above this size (bytes) are condensed before sending.
    pub gemini_condense_above: usize,

    /// Target length of a condensed summary. The hard ceiling is 1.5x.
    pub gemini_summary_target: usize,

    /// Files listed in a condensed summary.
    pub summary_max_files: usize,

    /// Imported modules listed in a condensed summary.
    pub summary_max_imports: usize,

    /// Declaration lines listed in a condensed summary.
    pub summary_max_declarations: usize,

    /// Maximum characters kept per declaration line.
    pub summary_line_chars: usize,
}

impl GatewayLimits {
    /// Hard ceiling on the condensed summary length.
    pub fn summary_ceiling(&self) -> usize {
        self.gemini_summary_target * 3 / 2
    }

    /// Raw diff size limit for providers that are not condensed.
    pub fn max_diff_for(&self, provider: ProviderKind) -> Option<usize> {
        match provider {
            ProviderKind::OpenAi => Some(self.openai_max_diff),
            ProviderKind::Anthropic => Some(self.anthropic_max_diff),
            ProviderKind::Local => Some(self.local_max_diff),
            ProviderKind::Gemini | ProviderKind::Rules => None,
        }
    }
}

impl Default for GatewayLimits {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            key_check_timeout_secs: 10,
            openai_max_diff: 60_000,
            anthropic_max_diff: 120_000,
            local_max_diff: 30_000,
            gemini_condense_above: 12_000,
            gemini_summary_target: 4_000,
            summary_max_files: 3,
            summary_max_imports: 5,
            summary_max_declarations: 8,
            summary_line_chars: 120,
        }
    }
}

/// UI/UX configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    /// Whether to use colors.
    pub color: bool,

    /// Whether to print the confidence next to generated messages.
    pub show_confidence: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_confidence: true,
        }
    }
}

/// Commit type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Refactor,
    Docs,
    Style,
    Test,
    Chore,
    Perf,
    Ci,
    Build,
    Revert,
}

impl CommitType {
    /// Get the string representation of the commit type.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Refactor => "refactor",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Perf => "perf",
            CommitType::Ci => "ci",
            CommitType::Build => "build",
            CommitType::Revert => "revert",
        }
    }

    /// Get a description of the commit type.
    pub fn description(&self) -> &'static str {
        match self {
            CommitType::Feat => "A new feature",
            CommitType::Fix => "A bug fix",
            CommitType::Refactor => "Code refactoring (no feature/fix)",
            CommitType::Docs => "Documentation only changes",
            CommitType::Style => "Code style changes (formatting, whitespace)",
            CommitType::Test => "Adding or updating tests",
            CommitType::Chore => "Maintenance and auxiliary tool changes",
            CommitType::Perf => "Performance improvements",
            CommitType::Ci => "CI configuration changes",
            CommitType::Build => "Build system or dependency changes",
            CommitType::Revert => "Reverting a previous commit",
        }
    }

    /// Get all commit types.
    pub fn all() -> &'static [CommitType] {
        &[
            CommitType::Feat,
            CommitType::Fix,
            CommitType::Refactor,
            CommitType::Docs,
            CommitType::Style,
            CommitType::Test,
            CommitType::Chore,
            CommitType::Perf,
            CommitType::Ci,
            CommitType::Build,
            CommitType::Revert,
        ]
    }
}

impl std::str::FromStr for CommitType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feat" | "feature" => Ok(CommitType::Feat),
            "fix" | "bugfix" => Ok(CommitType::Fix),
            "refactor" => Ok(CommitType::Refactor),
            "docs" | "doc" => Ok(CommitType::Docs),
            "style" => Ok(CommitType::Style),
            "test" | "tests" => Ok(CommitType::Test),
            "chore" => Ok(CommitType::Chore),
            "perf" | "performance" => Ok(CommitType::Perf),
            "ci" => Ok(CommitType::Ci),
            "build" => Ok(CommitType::Build),
            "revert" => Ok(CommitType::Revert),
            _ => Err(()),
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CsConfig::default();
        assert_eq!(config.ai.provider, ProviderKind::Rules);
        assert_eq!(config.ai.local_endpoint(), DEFAULT_LOCAL_ENDPOINT);
        assert_eq!(config.limits.request_timeout_secs, 30);
    }

    #[test]
    fn test_commit_type_from_str() {
        assert_eq!("feat".parse::<CommitType>(), Ok(CommitType::Feat));
        assert_eq!("FIX".parse::<CommitType>(), Ok(CommitType::Fix));
        assert!("wip".parse::<CommitType>().is_err());
        assert_eq!(CommitType::all().len(), 11);
    }

    #[test]
    fn test_is_configured() {
        assert!(ProviderConfig::new(ProviderKind::Rules).is_configured());
        assert!(ProviderConfig::new(ProviderKind::Local).is_configured());
        assert!(!ProviderConfig::new(ProviderKind::OpenAi).is_configured());
        assert!(!ProviderConfig::new(ProviderKind::Gemini)
            .with_api_key("  ")
            .is_configured());
        assert!(ProviderConfig::new(ProviderKind::Anthropic)
            .with_api_key("sk-ant")
            .is_configured());
    }

    #[test]
    fn test_provider_config_camel_case() {
        let json = r#"{"provider":"gemini","apiKey":"k","model":"gemini-pro"}"#;
        let config: ProviderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.provider, ProviderKind::Gemini);
        assert_eq!(config.api_key(), Some("k"));
        assert_eq!(config.model_or_default(), "gemini-pro");
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_summary_ceiling() {
        let limits = GatewayLimits {
            gemini_summary_target: 2_000,
            ..GatewayLimits::default()
        };
        assert_eq!(limits.summary_ceiling(), 3_000);
        assert_eq!(limits.max_diff_for(ProviderKind::Gemini), None);
    }

    #[test]
    fn test_config_serialization() {
        let config = CsConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("provider = \"rules\""));
        assert!(toml_str.contains("gemini_condense_above"));
    }
}
