// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration module for commitsense.
//!
//! This module handles loading, overlaying and writing back configuration
//! from settings files, command-line flags and defaults.

pub mod default;
mod loader;
mod schema;

pub use default::default_config;
pub use loader::{
    apply_overrides, find_config_file, load_config, save_config, save_provider_settings,
    settings_path, user_config_path, ProviderOverrides,
};
pub use schema::*;
