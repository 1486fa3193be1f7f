//! Configuration types for windowcharmer.
//!
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::APP_NAME;
use crate::hotkey::ChordModifier;
use crate::hotkey::keysym::default_keybindings;
use crate::platform::path::expand_and_resolve;
use crate::tiling::Action;
use crate::tiling::SessionOptions;
use crate::tiling::constants::{classify, ratio};

/// Default location of the state store.
pub const DEFAULT_STATE_PATH: &str = "/dev/shm/windowcharmer/state.json";

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CharmerConfig {
    /// Keysym name of the chord modifier key.
    /// Tapping it alone is passed through to other applications.
    /// Default: "Super_L"
    pub modifier: String,

    /// Modifier state held while a chord key is pressed:
    /// "shift", "control", "alt", "hyper" or "super".
    /// Default: "super"
    pub modifier_mask: ChordModifier,

    /// Keysym name to action. Names follow X keysym spelling
    /// (e.g. "KP_Home", "Left", "F5", "a").
    pub keybindings: BTreeMap<String, Action>,

    /// Classification tolerance in pixels.
    /// A window counts as occupying a zone when its edges are within this
    /// distance of the zone's edges.
    /// Default: 128
    pub tolerance: i32,

    /// Ratio index used on desktops without a stored selection.
    /// 0 disables the center column, 1 splits into thirds, 2..7 give the
    /// center column 40% to 65% of the screen width.
    /// Default: 2
    pub default_ratio_index: usize,

    /// Location of the state file holding the calibrated decoration sizes
    /// and the per-desktop ratio selection. Relative paths resolve against
    /// the configuration file's directory.
    /// Default: "/dev/shm/windowcharmer/state.json"
    pub state_path: String,

    /// Whether the bottom row is shifted up by the height of docked panels,
    /// as reported by the window manager's work area.
    /// Default: true
    pub panel_compensation: bool,
}

impl Default for CharmerConfig {
    fn default() -> Self {
        Self {
            modifier: "Super_L".to_string(),
            modifier_mask: ChordModifier::default(),
            keybindings: default_keybindings(),
            tolerance: classify::DEFAULT_DEVIATION_PX,
            default_ratio_index: ratio::DEFAULT_INDEX,
            state_path: DEFAULT_STATE_PATH.to_string(),
            panel_compensation: true,
        }
    }
}

impl CharmerConfig {
    /// Returns the session tunables derived from this configuration.
    #[must_use]
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            deviation: self.tolerance,
            default_ratio_index: self.default_ratio_index,
            panel_compensation: self.panel_compensation,
        }
    }

    /// Returns the state file location.
    ///
    /// # Arguments
    ///
    /// * `config_dir` - Directory of the loaded configuration file, if any
    #[must_use]
    pub fn state_file(&self, config_dir: Option<&Path>) -> PathBuf {
        let path = if self.state_path.trim().is_empty() {
            DEFAULT_STATE_PATH
        } else {
            self.state_path.as_str()
        };

        match config_dir {
            Some(dir) => expand_and_resolve(path, dir),
            None => crate::platform::path::expand(path),
        }
    }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/windowcharmer/config.jsonc \
                or ~/.windowcharmer.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Configuration file names in the home directory.
const HOME_CONFIG_FILE_NAMES: &[&str] = &[".windowcharmer.jsonc", ".windowcharmer.json"];

/// Returns the possible configuration file paths in priority order.
///
/// The function checks the following locations (both `.jsonc` and `.json` variants):
/// 1. `$XDG_CONFIG_HOME/windowcharmer/config.jsonc` when the variable is set
/// 2. `~/.config/windowcharmer/config.jsonc`
/// 3. The platform configuration directory reported by `dirs`
/// 4. `~/.windowcharmer.jsonc`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let push_dir = |dir: PathBuf, paths: &mut Vec<PathBuf>| {
        for filename in CONFIG_FILE_NAMES {
            let path = dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    };

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
        && !xdg_config.is_empty()
    {
        push_dir(PathBuf::from(xdg_config).join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        push_dir(home.join(".config").join(APP_NAME), &mut paths);
    }

    if let Some(config_dir) = dirs::config_dir() {
        push_dir(config_dir.join(APP_NAME), &mut paths);
    }

    if let Some(home) = dirs::home_dir() {
        for filename in HOME_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from the first available config file.
///
/// # Returns
///
/// The parsed configuration together with the path it was read from.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of the expected locations.
/// Returns `ConfigError::IoError` if a configuration file exists but could not be read.
/// Returns `ConfigError::ParseError` if the configuration file contains invalid JSON.
pub fn load_config() -> Result<(CharmerConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist, and the I/O or
/// parse error otherwise.
pub fn load_config_from_path(path: &Path) -> Result<(CharmerConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    // Strip comments from JSONC before parsing
    let reader = json_comments::StripComments::new(file);
    let config: CharmerConfig = serde_json::from_reader(reader)?;

    Ok((config, path.to_path_buf()))
}
