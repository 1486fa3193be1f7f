//! Named screen zones and rectangle classification.
//!
//! Classification is the left inverse of placement: a window placed into a
//! zone classifies back into that zone, within a tolerance that absorbs
//! decoration padding, rounding and compositor shadows.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::LayoutState;
use crate::tiling::state::Rect;

// ============================================================================
// Zone
// ============================================================================

/// A named screen region a window can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    TopCenter,
    BottomCenter,
    Center,
    /// Maximized on both axes.
    Full,
    /// Both maximize flags cleared, geometry left to the window manager.
    Restored,
    /// No zone matched within tolerance; never replayed.
    Unknown,
}

impl Zone {
    /// Every zone that maps to an explicit rectangle.
    pub const TILED: [Self; 9] = [
        Self::Left,
        Self::Right,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
        Self::TopCenter,
        Self::BottomCenter,
        Self::Center,
    ];

    /// Returns the kebab-case name of the zone.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::TopCenter => "top-center",
            Self::BottomCenter => "bottom-center",
            Self::Center => "center",
            Self::Full => "full",
            Self::Restored => "restored",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` for zones that live in the center column.
    #[must_use]
    pub const fn is_center(&self) -> bool {
        matches!(self, Self::Center | Self::TopCenter | Self::BottomCenter)
    }

    /// Returns `true` if a window in this zone should be replayed on re-tile.
    #[must_use]
    pub const fn is_known(&self) -> bool { !matches!(self, Self::Unknown) }

    /// Moves center-column zones to the matching left-column zone.
    ///
    /// Used when the center column disappears, so centered windows fall to
    /// the left instead of being left unplaced.
    #[must_use]
    pub const fn without_center(self) -> Self {
        match self {
            Self::Center => Self::Left,
            Self::TopCenter => Self::TopLeft,
            Self::BottomCenter => Self::BottomLeft,
            other => other,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "top-left" => Ok(Self::TopLeft),
            "top-right" => Ok(Self::TopRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-right" => Ok(Self::BottomRight),
            "top-center" => Ok(Self::TopCenter),
            "bottom-center" => Ok(Self::BottomCenter),
            "center" => Ok(Self::Center),
            "full" => Ok(Self::Full),
            "restored" => Ok(Self::Restored),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Invalid zone '{s}'")),
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Vertical component of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalSlot {
    Top,
    Bottom,
    /// Vertically maximized.
    Full,
}

/// Horizontal component of a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalSlot {
    Left,
    Right,
    Center,
}

/// Per-axis result of classifying a window rectangle.
///
/// An axis that matched nothing within tolerance is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Classification {
    pub vertical: Option<VerticalSlot>,
    pub horizontal: Option<HorizontalSlot>,
}

impl Classification {
    /// Composes both axes into a zone.
    ///
    /// Any unresolved axis yields [`Zone::Unknown`].
    #[must_use]
    pub const fn zone(&self) -> Zone {
        match (self.vertical, self.horizontal) {
            (Some(VerticalSlot::Full), Some(HorizontalSlot::Left)) => Zone::Left,
            (Some(VerticalSlot::Full), Some(HorizontalSlot::Right)) => Zone::Right,
            (Some(VerticalSlot::Full), Some(HorizontalSlot::Center)) => Zone::Center,
            (Some(VerticalSlot::Top), Some(HorizontalSlot::Left)) => Zone::TopLeft,
            (Some(VerticalSlot::Top), Some(HorizontalSlot::Right)) => Zone::TopRight,
            (Some(VerticalSlot::Top), Some(HorizontalSlot::Center)) => Zone::TopCenter,
            (Some(VerticalSlot::Bottom), Some(HorizontalSlot::Left)) => Zone::BottomLeft,
            (Some(VerticalSlot::Bottom), Some(HorizontalSlot::Right)) => Zone::BottomRight,
            (Some(VerticalSlot::Bottom), Some(HorizontalSlot::Center)) => Zone::BottomCenter,
            _ => Zone::Unknown,
        }
    }
}

/// Renders the raw `{vertical}-{horizontal}` composition, e.g. `top-unknown`.
///
/// A `full-` prefix is dropped, so a vertically maximized left window reads
/// `left` and a maximized window that matched no column reads `unknown`.
impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let horizontal = match self.horizontal {
            Some(HorizontalSlot::Left) => "left",
            Some(HorizontalSlot::Right) => "right",
            Some(HorizontalSlot::Center) => "center",
            None => "unknown",
        };

        match self.vertical {
            Some(VerticalSlot::Full) => f.write_str(horizontal),
            Some(VerticalSlot::Top) => write!(f, "top-{horizontal}"),
            Some(VerticalSlot::Bottom) => write!(f, "bottom-{horizontal}"),
            None => write!(f, "unknown-{horizontal}"),
        }
    }
}

const fn within(value: i32, target: i32, deviation: i32) -> bool {
    (value - target).abs() <= deviation
}

/// Classifies a window rectangle against a layout.
///
/// # Arguments
///
/// * `rect` - The window's current rectangle in root coordinates
/// * `is_vmax` - Whether the window is vertically maximized
/// * `layout` - The layout the window is matched against
/// * `deviation` - Tolerance in pixels applied to every comparison
#[must_use]
pub fn classify(rect: Rect, is_vmax: bool, layout: &LayoutState, deviation: i32) -> Classification {
    let vertical = if is_vmax {
        Some(VerticalSlot::Full)
    } else if within(rect.height, layout.h_half, deviation) {
        if within(rect.y, layout.y_top, deviation) {
            Some(VerticalSlot::Top)
        } else if within(rect.y, layout.y_bottom, deviation) {
            Some(VerticalSlot::Bottom)
        } else {
            None
        }
    } else {
        None
    };

    let horizontal = if within(rect.width, layout.w_side, deviation) {
        // Nearest column origin wins; ties keep the earlier candidate
        [
            (HorizontalSlot::Left, layout.x_left),
            (HorizontalSlot::Right, layout.x_right),
            (HorizontalSlot::Center, layout.x_center),
        ]
        .into_iter()
        .filter(|(_, origin)| within(rect.x, *origin, deviation))
        .min_by_key(|(_, origin)| (rect.x - origin).abs())
        .map(|(slot, _)| slot)
    } else if within(rect.width, layout.w_center, deviation)
        && within(rect.x, layout.x_center, deviation)
    {
        Some(HorizontalSlot::Center)
    } else {
        None
    };

    Classification { vertical, horizontal }
}

// ============================================================================
// Tests
// ============================================================================
