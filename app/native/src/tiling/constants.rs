//! Internal constants for the tiling engine.
//!
//! # Organization
//!
//! Constants are grouped by functionality:
//! - `classify` - Zone classification tolerances
//! - `ratio` - Center-column ratio defaults
//! - `state_keys` - Keys used in the persisted state store

/// Zone classification tolerances.
pub mod classify {
    /// Default deviation (px) allowed when matching a window to a zone.
    ///
    /// Decoration padding, rounding and compositor shadows mean window
    /// rectangles are never pixel exact. This value separates the distinct
    /// width classes on screens at least ~1000px wide; narrower screens need
    /// a smaller value.
    pub const DEFAULT_DEVIATION_PX: i32 = 128;
}

/// Center-column ratio defaults.
pub mod ratio {
    /// Ratio index used for desktops without a stored selection (40%).
    pub const DEFAULT_INDEX: usize = 2;
}

/// Keys used in the persisted state store.
pub mod state_keys {
    use crate::tiling::state::DesktopId;

    /// Usable height reported by a vertically maximized window.
    pub const MEASURED_HEIGHT: &str = "measured_height";

    /// Sum of top and bottom decoration extents.
    pub const MEASURED_DECORATIONS: &str = "measured_decorations";

    /// Returns the key holding the ratio index of a desktop.
    #[must_use]
    pub fn ratio_index(desktop: DesktopId) -> String { format!("ratio_idx_{desktop}") }
}

// ============================================================================
// Tests
// ============================================================================
