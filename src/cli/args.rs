// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ProviderOverrides;

/// commitsense - conventional commit messages from staged changes
///
/// Stages files, infers a commit message with a rule-based classifier or an
/// optional AI provider, and commits. `serve` exposes the same operations to
/// an editor panel over stdio.
#[derive(Parser, Debug)]
#[command(name = "commitsense")]
#[command(author = "Eshan Roy")]
#[command(version)]
#[command(about = "Git panel and conventional commit message inference", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Show what would be done without actually doing it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Provider to use (openai, anthropic, gemini, local, rules)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// API key for the selected provider
    #[arg(long, global = true, env = "COMMITSENSE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name for the selected provider
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Endpoint URL for the local provider
    #[arg(long, global = true)]
    pub endpoint: Option<String>,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List staged and unstaged files
    Status,

    /// Stage a file
    Stage {
        /// Path relative to the repository root
        path: String,
    },

    /// Remove a file from the index
    Unstage {
        /// Path relative to the repository root
        path: String,
    },

    /// Stage every change in the working tree
    StageAll,

    /// Suggest a commit message for the staged changes
    Generate(GenerateArgs),

    /// Format a conventional commit message and commit
    Commit(CommitArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Speak the panel protocol as JSON lines over stdin/stdout
    Serve,

    /// Print version information
    Version,
}

/// Arguments for the generate command.
#[derive(Parser, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Commit with the suggested message
    #[arg(long)]
    pub commit: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the commit command.
#[derive(Parser, Debug, Clone)]
pub struct CommitArgs {
    /// Commit type (feat, fix, docs, ...)
    #[arg(short = 't', long)]
    pub r#type: String,

    /// Optional scope
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Commit subject
    #[arg(short = 'm', long)]
    pub message: String,
}

/// Arguments for the config command.
#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Persist one provider setting
    Set {
        /// provider, api-key, model or endpoint
        key: String,

        /// New value
        value: String,
    },

    /// Write an example configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Provider settings given on the command line.
    pub fn overrides(&self) -> ProviderOverrides {
        ProviderOverrides {
            provider: self.provider.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parsing() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stage_command() {
        let cli = Cli::parse_from(["commitsense", "stage", "src/lib.rs"]);
        match cli.command {
            Commands::Stage { path } => assert_eq!(path, "src/lib.rs"),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_commit_command() {
        let cli = Cli::parse_from([
            "commitsense",
            "commit",
            "-t",
            "feat",
            "-s",
            "auth",
            "-m",
            "add login",
        ]);

        if let Commands::Commit(args) = cli.command {
            assert_eq!(args.r#type, "feat");
            assert_eq!(args.scope, Some("auth".to_string()));
            assert_eq!(args.message, "add login");
        } else {
            panic!("Expected Commit command");
        }
    }

    #[test]
    fn test_commit_requires_type_and_message() {
        assert!(Cli::try_parse_from(["commitsense", "commit", "-m", "x"]).is_err());
        assert!(Cli::try_parse_from(["commitsense", "commit", "-t", "fix"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "commitsense",
            "generate",
            "--provider",
            "gemini",
            "--model",
            "gemini-1.5-pro",
            "--dry-run",
        ]);
        assert!(cli.dry_run);
        let overrides = cli.overrides();
        assert_eq!(overrides.provider.as_deref(), Some("gemini"));
        assert_eq!(overrides.model.as_deref(), Some("gemini-1.5-pro"));
        assert!(matches!(cli.command, Commands::Generate(ref a) if !a.commit && !a.yes));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["commitsense", "config", "set", "provider", "local"]);
        match cli.command {
            Commands::Config(ConfigArgs {
                action: ConfigAction::Set { key, value },
            }) => {
                assert_eq!(key, "provider");
                assert_eq!(value, "local");
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["commitsense", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }
}
