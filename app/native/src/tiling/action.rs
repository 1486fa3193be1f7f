//! Actions accepted by the tiling session.
//!
//! The same set is used by the CLI (one action per invocation) and by the
//! keybindings of the chord daemon.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::layout::Zone;

/// A tiling action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Full-height left column.
    Left,
    /// Full-height center column.
    Center,
    /// Full-height right column.
    Right,
    /// Top half of the left column.
    TopLeft,
    /// Bottom half of the left column.
    BottomLeft,
    /// Top half of the right column.
    TopRight,
    /// Bottom half of the right column.
    BottomRight,
    /// Top half of the center column.
    TopCenter,
    /// Bottom half of the center column.
    BottomCenter,
    /// Maximize on both axes.
    Max,
    /// Clear both maximize flags.
    Restore,
    /// Widen the center column and re-tile the desktop.
    Bigger,
    /// Narrow the center column and re-tile the desktop.
    Smaller,
    /// List windows on the active desktop with their zones.
    #[value(alias = "test")]
    #[serde(alias = "test")]
    List,
}

impl Action {
    /// Returns the zone the active window is placed into, for window actions.
    #[must_use]
    pub const fn target_zone(&self) -> Option<Zone> {
        match self {
            Self::Left => Some(Zone::Left),
            Self::Center => Some(Zone::Center),
            Self::Right => Some(Zone::Right),
            Self::TopLeft => Some(Zone::TopLeft),
            Self::BottomLeft => Some(Zone::BottomLeft),
            Self::TopRight => Some(Zone::TopRight),
            Self::BottomRight => Some(Zone::BottomRight),
            Self::TopCenter => Some(Zone::TopCenter),
            Self::BottomCenter => Some(Zone::BottomCenter),
            Self::Max => Some(Zone::Full),
            Self::Restore => Some(Zone::Restored),
            Self::Bigger | Self::Smaller | Self::List => None,
        }
    }

    /// Returns the ratio step for desktop-wide actions.
    #[must_use]
    pub const fn ratio_step(&self) -> Option<i32> {
        match self {
            Self::Bigger => Some(1),
            Self::Smaller => Some(-1),
            _ => None,
        }
    }

    /// Returns the kebab-case name of the action.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
            Self::TopCenter => "top-center",
            Self::BottomCenter => "bottom-center",
            Self::Max => "max",
            Self::Restore => "restore",
            Self::Bigger => "bigger",
            Self::Smaller => "smaller",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s, false).map_err(|_| format!("Invalid action '{s}'"))
    }
}

// ============================================================================
// Tests
// ============================================================================
