//! State types for the tiling engine.
//!
//! This module defines the geometric inputs the layout engine works from:
//! the screen size, the learned decoration profile, and the rectangles and
//! frame extents reported for individual windows.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// Opaque handle of a window owned by the windowing system.
///
/// The tiling engine never creates or destroys windows; it only reads and
/// repositions them through the [`WindowSystem`](super::backend::WindowSystem)
/// collaborator.
pub type WindowHandle = u32;

/// Identifier of a logical desktop (`_NET_CURRENT_DESKTOP`).
pub type DesktopId = u32;

// ============================================================================
// Geometric Types
// ============================================================================

/// A pixel rectangle in root-window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Width of the rectangle.
    pub width: i32,
    /// Height of the rectangle.
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}) {}x{}", self.x, self.y, self.width, self.height)
    }
}

// ============================================================================
// Screen
// ============================================================================

/// Size of the root window, queried once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    /// Width of the screen in pixels.
    pub width: i32,
    /// Height of the screen in pixels.
    pub height: i32,
}

impl ScreenGeometry {
    /// Creates a new screen geometry.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

// ============================================================================
// Decorations
// ============================================================================

/// Window-manager chrome learned by measuring a vertically maximized window.
///
/// The profile is global: decoration themes apply to the whole environment,
/// so a single measurement is shared by every desktop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationProfile {
    /// Usable screen height reported by a vertically maximized window.
    ///
    /// When present, this overrides the raw display height in row math.
    pub measured_height: Option<i32>,
    /// Sum of the top and bottom frame extents drawn by the window manager.
    pub measured_decoration_px: i32,
}

impl DecorationProfile {
    /// Creates a profile from a measured height and decoration size.
    #[must_use]
    pub const fn measured(height: i32, decoration_px: i32) -> Self {
        Self {
            measured_height: Some(height),
            measured_decoration_px: decoration_px,
        }
    }

    /// Returns the height rows are computed from.
    #[must_use]
    pub fn effective_height(&self, geometry: ScreenGeometry) -> i32 {
        self.measured_height.unwrap_or(geometry.height)
    }
}

/// Frame extents reported for a window, in `left, right, top, bottom` order.
///
/// Used both for `_NET_FRAME_EXTENTS` (server-side decorations) and
/// `_GTK_FRAME_EXTENTS` (client-side shadows and padding).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameExtents {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

impl FrameExtents {
    /// Creates new frame extents.
    #[must_use]
    pub const fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Builds extents from a raw `CARDINAL[4]` property value.
    ///
    /// Returns `None` when fewer than four values are present.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_cardinals(values: &[u32]) -> Option<Self> {
        match values {
            [left, right, top, bottom, ..] => Some(Self::new(
                *left as i32,
                *right as i32,
                *top as i32,
                *bottom as i32,
            )),
            _ => None,
        }
    }

    /// Returns the combined horizontal extent.
    #[must_use]
    pub const fn horizontal(&self) -> i32 { self.left + self.right }

    /// Returns the combined vertical extent.
    #[must_use]
    pub const fn vertical(&self) -> i32 { self.top + self.bottom }
}

// ============================================================================
// Tests
// ============================================================================
