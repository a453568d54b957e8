// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading, overlaying and persistence.

use crate::error::{ConfigError, CsError, Result};
use std::path::{Path, PathBuf};

use super::schema::{CsConfig, ProviderConfig, ProviderKind};

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &[
    "commitsense.toml",
    ".commitsense.toml",
    ".config/commitsense.toml",
];

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(home) = dirs::home_dir() {
        for config_name in CONFIG_FILES {
            let config_path = home.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }
    }

    let user_config = user_config_path()?;
    user_config.exists().then_some(user_config)
}

/// Per-user settings file (`$XDG_CONFIG_HOME/commitsense/config.toml`).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("commitsense").join("config.toml"))
}

/// Where settings updates are written: the file in use, else the user file.
pub fn settings_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(find_config_file)
        .or_else(user_config_path)
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<CsConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(CsConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<CsConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(CsError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        CsError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<CsConfig> {
    toml::from_str(content).map_err(|e| {
        CsError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}

/// Write the whole configuration to `path`, creating parent directories.
pub fn save_config(path: &Path, config: &CsConfig) -> Result<()> {
    let write_err = |message: String| {
        CsError::Config(ConfigError::WriteFailed {
            path: path.to_path_buf(),
            message,
        })
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
    }

    let content = toml::to_string_pretty(config).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| write_err(e.to_string()))?;
    tracing::debug!("Saved configuration to: {:?}", path);
    Ok(())
}

/// Replace the `[ai]` table of the settings file at `path`.
///
/// The rest of the file is preserved; a missing file is created.
pub fn save_provider_settings(path: &Path, ai: &ProviderConfig) -> Result<()> {
    let mut config = if path.exists() {
        load_config_from(path)?
    } else {
        CsConfig::default()
    };
    config.ai = ai.clone();
    save_config(path, &config)
}

/// Provider settings given on the command line or via environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

/// Overlay command-line provider settings onto the loaded configuration.
pub fn apply_overrides(mut config: CsConfig, overrides: &ProviderOverrides) -> Result<CsConfig> {
    if let Some(ref name) = overrides.provider {
        config.ai.provider = name.parse::<ProviderKind>().map_err(|_| {
            CsError::Config(ConfigError::InvalidValue {
                key: "provider".to_string(),
                message: format!(
                    "unknown provider '{}', expected one of: openai, anthropic, gemini, local, rules",
                    name
                ),
            })
        })?;
    }
    if let Some(ref key) = overrides.api_key {
        config.ai.api_key = Some(key.clone());
    }
    if let Some(ref model) = overrides.model {
        config.ai.model = Some(model.clone());
    }
    if let Some(ref endpoint) = overrides.endpoint {
        config.ai.endpoint = Some(endpoint.clone());
    }
    Ok(config)
}
