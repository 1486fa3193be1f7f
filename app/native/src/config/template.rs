//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
///
/// The values shown are the defaults, so an untouched template behaves
/// exactly like a missing configuration file.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// windowcharmer Configuration File
// ================================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.
//
// Run `windowcharmer --schema` for the full JSON Schema.

{
  // ============================================================================
  // Chord Capture
  // ============================================================================
  // Keysym name of the modifier key. Tapping it alone still reaches other
  // applications; holding it turns the keys below into tiling chords.
  // "modifier": "Super_L",
  //
  // Modifier state held during a chord: "shift", "control", "alt", "hyper"
  // or "super".
  // "modifierMask": "super",
  //
  // Keysym name to action. Setting this replaces the whole default map.
  // Actions: "left", "center", "right", "top-left", "top-center",
  // "top-right", "bottom-left", "bottom-center", "bottom-right", "max",
  // "restore", "bigger", "smaller", "list".
  // "keybindings": {
  //   "KP_Home": "top-left",     "KP_Up": "top-center",      "KP_Page_Up": "top-right",
  //   "KP_Left": "left",         "KP_Begin": "center",       "KP_Right": "right",
  //   "KP_End": "bottom-left",   "KP_Down": "bottom-center", "KP_Page_Down": "bottom-right",
  //   "KP_Insert": "restore",    "KP_Add": "bigger",         "KP_Subtract": "smaller",
  //   "KP_Prior": "top-right",   "KP_Next": "bottom-right",
  //   "Left": "left",            "Down": "center",           "Right": "right",
  //   "Up": "max",               "space": "restore"
  // },

  // ============================================================================
  // Layout
  // ============================================================================
  // Distance in pixels within which a window counts as sitting in a zone.
  // Lower it on screens narrower than ~1000px.
  // "tolerance": 128,
  //
  // Center column width for desktops without a stored selection:
  // 0 = no center column, 1 = thirds, 2..7 = 40%, 45%, 50%, 55%, 60%, 65%.
  // "defaultRatioIndex": 2,
  //
  // Shift the bottom row up by the height of docked panels.
  // "panelCompensation": true,

  // ============================================================================
  // State
  // ============================================================================
  // File holding measured decoration sizes and per-desktop ratio selections.
  // "statePath": "/dev/shm/windowcharmer/state.json"
}
"#
    .to_string()
}

/// Creates a configuration file with the template at the specified path.
///
/// Creates parent directories if they don't exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
