// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::path::Path;
use std::time::Duration;

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};

use crate::commit::{format, CommitMessage};
use crate::config::{
    apply_overrides, default::example_config, find_config_file, save_provider_settings,
    settings_path, CsConfig,
};
use crate::error::{ConfigError, CsError, GitError, Result};
use crate::git::{commit_command_line, diff_summary, FileEntry, GitCommands, Repository, SystemGit};
use crate::panel::{serve_stdio, PanelController};
use crate::provider::{Gateway, Generation, GenerationSource, ProviderKind};

use super::args::{Cli, CommitArgs, Commands, ConfigAction, GenerateArgs};

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> Result<()> {
    let config = load_effective_config(&cli)?;
    if !config.ui.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    match cli.command.clone() {
        Commands::Status => run_status(),
        Commands::Stage { path } => run_stage(&cli, &path),
        Commands::Unstage { path } => run_unstage(&cli, &path),
        Commands::StageAll => run_stage_all(&cli),
        Commands::Generate(args) => run_generate(&cli, &config, args).await,
        Commands::Commit(args) => run_commit(&cli, args),
        Commands::Config(args) => run_config(&cli, &config, args.action),
        Commands::Serve => run_serve(&cli, config).await,
        Commands::Version => run_version(),
    }
}

/// Configuration file (or defaults) with command-line overrides applied.
fn load_effective_config(cli: &Cli) -> Result<CsConfig> {
    let config = match &cli.config {
        Some(path) => CsConfig::load_from(path)?,
        None => CsConfig::load()?,
    };
    apply_overrides(config, &cli.overrides())
}

/// Git commands rooted at the repository containing the current directory.
fn open_repository() -> Result<(Repository, GitCommands)> {
    let repo = Repository::open_current()?;
    let git = GitCommands::new(SystemGit::new(repo.workdir()));
    Ok((repo, git))
}

fn print_entries(title: &str, entries: &[FileEntry], staged: bool) {
    println!("{}", style(title).bold());
    if entries.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for entry in entries {
        let label = entry.label(staged);
        let label = if staged {
            style(label).green()
        } else {
            style(label).red()
        };
        println!("  {} {}", label, entry.path);
    }
}

/// Run the status command.
fn run_status() -> Result<()> {
    let (repo, git) = open_repository()?;
    let status = git.status()?;

    if let Some(branch) = repo.branch_name() {
        println!("On branch {}", style(branch).cyan());
    }
    print_entries("Staged changes:", &status.staged, true);
    print_entries("Changes:", &status.unstaged, false);
    if status.nothing_staged() && !status.unstaged.is_empty() {
        println!(
            "{}",
            style("Nothing staged. Use `commitsense stage <path>` or `stage-all`.").dim()
        );
    }
    Ok(())
}

/// Run the stage command.
fn run_stage(cli: &Cli, path: &str) -> Result<()> {
    let (_, git) = open_repository()?;
    if cli.dry_run {
        println!("Would stage: {}", path);
        return Ok(());
    }
    git.stage_file(path)?;
    println!("{} Staged {}", style("✓").green(), path);
    Ok(())
}

/// Run the unstage command.
fn run_unstage(cli: &Cli, path: &str) -> Result<()> {
    let (_, git) = open_repository()?;
    if cli.dry_run {
        println!("Would unstage: {}", path);
        return Ok(());
    }
    git.unstage_file(path)?;
    println!("{} Unstaged {}", style("✓").green(), path);
    Ok(())
}

/// Run the stage-all command.
fn run_stage_all(cli: &Cli) -> Result<()> {
    let (_, git) = open_repository()?;
    if cli.dry_run {
        println!("Would stage all changes");
        return Ok(());
    }
    git.stage_all()?;
    println!("{} Staged all changes", style("✓").green());
    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(template);
    }
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn source_label(source: GenerationSource) -> String {
    match source {
        GenerationSource::Provider(kind) => kind.display_name().to_string(),
        GenerationSource::Condensed(kind) => format!("{} (condensed diff)", kind.display_name()),
        GenerationSource::Rules => "built-in rules".to_string(),
    }
}

/// Run the generate command.
async fn run_generate(cli: &Cli, config: &CsConfig, args: GenerateArgs) -> Result<()> {
    tracing::debug!("Running generate command with args: {:?}", args);

    let (_, git) = open_repository()?;
    let changes = git.staged_changes()?;
    let raw = changes.to_signal_text();

    let gateway = Gateway::new(config.ai.clone(), config.limits.clone());
    let bar = if config.ai.provider == ProviderKind::Rules {
        None
    } else {
        Some(spinner(format!(
            "Asking {} for a commit message...",
            config.ai.provider.display_name()
        )))
    };
    let result = gateway.generate(&raw).await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let Generation {
        content,
        source,
        advisory,
    } = result?;

    if let Some(advisory) = advisory {
        eprintln!("{} {}", style("!").yellow().bold(), advisory.message);
    }

    let message = content.to_commit_message();
    println!("{}", style(diff_summary(&changes)).dim());
    println!("{}", style(&message).bold());
    if config.ui.show_confidence {
        println!(
            "{}",
            style(format!(
                "confidence {:.0}% via {}",
                content.confidence * 100.0,
                source_label(source)
            ))
            .dim()
        );
    }

    if !args.commit {
        return Ok(());
    }
    commit_message(cli, &git, &message, args.yes)
}

/// Run the commit command.
fn run_commit(cli: &Cli, args: CommitArgs) -> Result<()> {
    tracing::debug!("Running commit command with args: {:?}", args);

    let scope = args.scope.as_deref().unwrap_or_default();
    let message = format(&args.r#type, scope, &args.message);
    let parsed = CommitMessage::parse(&message)?;

    let (repo, git) = open_repository()?;
    if !cli.dry_run && !repo.has_staged_changes()? {
        return Err(CsError::Git(GitError::NoStagedChanges));
    }
    commit_message(cli, &git, &parsed.to_message(), true)
}

fn commit_message(cli: &Cli, git: &GitCommands, message: &str, skip_confirm: bool) -> Result<()> {
    if cli.dry_run {
        println!("Would run: {}", commit_command_line(message));
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Commit with this message?")
            .default(true)
            .interact()?;
        if !confirmed {
            return Err(CsError::Cancelled);
        }
    }

    let summary = git.commit(message)?;
    println!("{} {}", style("✓").green(), summary);
    Ok(())
}

/// Run the config command.
fn run_config(cli: &Cli, config: &CsConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => run_config_show(config),
        ConfigAction::Set { key, value } => run_config_set(cli, config, &key, &value),
        ConfigAction::Init { force } => run_init(cli, force),
    }
}

fn run_config_show(config: &CsConfig) -> Result<()> {
    let mut shown = config.clone();
    if shown.ai.api_key.is_some() {
        shown.ai.api_key = Some("********".to_string());
    }

    let source = find_config_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    println!("{}", style(format!("# loaded from {}", source)).dim());

    let rendered = toml::to_string_pretty(&shown).map_err(|e| CsError::WithContext {
        context: "Failed to render configuration".to_string(),
        message: e.to_string(),
    })?;
    print!("{}", rendered);
    Ok(())
}

fn run_config_set(cli: &Cli, config: &CsConfig, key: &str, value: &str) -> Result<()> {
    let mut ai = config.ai.clone();
    match key {
        "provider" => {
            ai.provider = value.parse().map_err(|_| {
                CsError::Config(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("unknown provider '{}'", value),
                })
            })?;
        }
        "api-key" | "apiKey" => ai.api_key = Some(value.to_string()),
        "model" => ai.model = Some(value.to_string()),
        "endpoint" => ai.endpoint = Some(value.to_string()),
        _ => {
            return Err(CsError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "expected one of: provider, api-key, model, endpoint".to_string(),
            }))
        }
    }

    let path = settings_path(cli.config.as_deref()).ok_or_else(|| {
        CsError::Config(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "no settings location available".to_string(),
        })
    })?;

    if cli.dry_run {
        println!("Would write {} to {}", key, path.display());
        return Ok(());
    }

    save_provider_settings(&path, &ai)?;
    println!("{} Saved {} to {}", style("✓").green(), key, path.display());
    Ok(())
}

/// Run the init command.
fn run_init(cli: &Cli, force: bool) -> Result<()> {
    let config_path = cli
        .config
        .as_deref()
        .unwrap_or_else(|| Path::new("commitsense.toml"));

    if config_path.exists() && !force {
        return Err(CsError::Config(ConfigError::InvalidValue {
            key: "path".to_string(),
            message: format!(
                "{} already exists. Use --force to overwrite.",
                config_path.display()
            ),
        }));
    }

    if cli.dry_run {
        println!("Would write configuration to: {}", config_path.display());
        return Ok(());
    }

    std::fs::write(config_path, example_config())?;
    println!(
        "{} Created configuration file: {}",
        style("✓").green(),
        config_path.display()
    );
    Ok(())
}

/// Run the serve command.
async fn run_serve(cli: &Cli, config: CsConfig) -> Result<()> {
    let git = GitCommands::new(SystemGit::current_dir()?);
    let gateway = Gateway::new(config.ai, config.limits);
    let mut controller = PanelController::new(git, gateway, settings_path(cli.config.as_deref()));

    tracing::debug!("Serving panel protocol on stdio");
    serve_stdio(&mut controller)
        .await
        .map_err(|e| CsError::WithContext {
            context: "Panel transport failed".to_string(),
            message: format!("{:#}", e),
        })
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("commitsense {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}
