//! Configuration module for windowcharmer.
//!
//! This module provides the configuration types, loading, template creation
//! and the JSON Schema of the configuration file.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

pub mod schema;
pub mod template;
mod types;

use std::path::{Path, PathBuf};

pub use types::{
    CharmerConfig, ConfigError, DEFAULT_STATE_PATH, config_paths, load_config,
    load_config_from_path,
};

/// A configuration together with the file it was read from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// The parsed configuration (defaults when no file was read).
    pub config: CharmerConfig,
    /// The file the configuration was read from, if any.
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Returns the resolved state file location.
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.config.state_file(self.path.as_deref().and_then(Path::parent))
    }
}

/// Loads the configuration from an explicit file.
///
/// Unlike [`load_or_default`], errors are returned rather than replaced by
/// defaults: a file named on the command line must be valid.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or invalid.
pub fn load_from(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let (config, path) = load_config_from_path(path)?;
    tracing::debug!(path = %path.display(), "config: loaded");
    Ok(LoadedConfig { config, path: Some(path) })
}

/// Loads the configuration from the default search paths.
///
/// Returns the loaded configuration, or a default configuration if loading fails.
/// If no configuration file exists, creates a template configuration file.
#[must_use]
pub fn load_or_default() -> LoadedConfig {
    match load_config() {
        Ok((config, path)) => {
            tracing::debug!(path = %path.display(), "config: loaded");
            LoadedConfig { config, path: Some(path) }
        }
        Err(ConfigError::NotFound) => LoadedConfig {
            config: CharmerConfig::default(),
            path: create_default_config_file(),
        },
        Err(err) => {
            tracing::warn!(error = %err, "config: failed to load configuration, using defaults");
            LoadedConfig::default()
        }
    }
}

/// Creates a template configuration file at the default location.
///
/// This is called when no configuration file is found during startup.
fn create_default_config_file() -> Option<PathBuf> {
    let Some(config_path) = config_paths().into_iter().next() else {
        tracing::debug!("config: no config path available for creating template");
        return None;
    };

    if config_path.exists() {
        return None;
    }

    match template::create_config_file(&config_path) {
        Ok(()) => {
            tracing::info!(
                path = %config_path.display(),
                "config: created default configuration file"
            );
            Some(config_path)
        }
        Err(err) => {
            tracing::debug!(
                error = %err,
                path = %config_path.display(),
                "config: failed to create default configuration file"
            );
            None
        }
    }
}
