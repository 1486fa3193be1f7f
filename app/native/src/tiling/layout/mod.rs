//! Zone geometry for the tiling engine.
//!
//! This module derives the absolute pixel rectangles of every zone from the
//! screen size, the selected center-column ratio and the measured decoration
//! profile, and maps window rectangles back into zones.
//!
//! # Zones
//!
//! ```text
//! +-----------+----------------+-----------+
//! | top-left  |   top-center   | top-right |
//! +-----------+----------------+-----------+
//! |bottom-left| bottom-center  |bottom-rght|
//! +-----------+----------------+-----------+
//!   w_side         w_center        w_side
//! ```
//!
//! `left`, `center` and `right` span the full height. With a zero ratio the
//! center column disappears and the screen is split into two halves.

mod placement;
mod ratio;
mod zone;

use serde::Serialize;

pub use placement::{MaximizeFlags, Placement, compensate_client_side};
pub use ratio::{Ratio, RatioTable};
pub use zone::{Classification, HorizontalSlot, VerticalSlot, Zone, classify};

use super::state::{DecorationProfile, ScreenGeometry};

// ============================================================================
// Layout State
// ============================================================================

/// Absolute zone metrics for one screen, ratio and decoration profile.
///
/// Derived on every turn and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutState {
    /// X origin of the left column.
    pub x_left: i32,
    /// X origin of the right column.
    pub x_right: i32,
    /// X origin of the center column.
    pub x_center: i32,
    /// Y origin of the top row.
    pub y_top: i32,
    /// Y origin of the bottom row.
    pub y_bottom: i32,
    /// Width of each side column.
    pub w_side: i32,
    /// Width of the center column (0 when there is none).
    pub w_center: i32,
    /// Height of a half-height row.
    pub h_half: i32,
    /// Height of a full-height column.
    pub h_full: i32,
    /// Measured decoration height, used to compensate client-side shadows.
    pub h_decor: i32,
    /// Vertical offset applied to the bottom row (panels, docks).
    pub panel_inset: i32,
}

impl LayoutState {
    /// Computes zone metrics.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Size of the root window
    /// * `decoration` - Learned decoration profile (measured height overrides the screen height)
    /// * `ratio` - Center-column ratio
    /// * `panel_inset` - Workarea-derived offset added to the bottom row origin
    ///
    /// Never fails: degenerate inputs produce degenerate but well-defined
    /// rectangles.
    #[must_use]
    pub fn compute(
        geometry: ScreenGeometry,
        decoration: &DecorationProfile,
        ratio: Ratio,
        panel_inset: i32,
    ) -> Self {
        let width = geometry.width;
        let height = decoration.effective_height(geometry);

        let w_center = ratio.of(width);
        let w_side = (width - w_center).div_euclid(2);
        let h_half = (height - decoration.measured_decoration_px).div_euclid(2);

        Self {
            x_left: 0,
            // Anchored to the screen edge so rounding never leaves a gap on the right
            x_right: width - w_side,
            x_center: (width - w_center).div_euclid(2),
            y_top: 0,
            y_bottom: height - h_half + panel_inset,
            w_side,
            w_center,
            h_half,
            h_full: height,
            h_decor: decoration.measured_decoration_px,
            panel_inset,
        }
    }

    /// Returns `true` when the layout has a center column.
    #[must_use]
    pub const fn has_center(&self) -> bool { self.w_center > 0 }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> ScreenGeometry { ScreenGeometry::new(1920, 1080) }

    #[test]
    fn test_half_ratio_on_full_hd() {
        let layout = LayoutState::compute(
            screen(),
            &DecorationProfile::default(),
            Ratio::new(50, 100),
            0,
        );

        assert_eq!(layout.w_side, 480);
        assert_eq!(layout.w_center, 960);
        assert_eq!(layout.x_left, 0);
        assert_eq!(layout.x_right, 1440);
        assert_eq!(layout.x_center, 480);
        assert_eq!(layout.h_half, 540);
        assert_eq!(layout.h_full, 1080);
        assert_eq!(layout.y_top, 0);
        assert_eq!(layout.y_bottom, 540);
    }

    #[test]
    fn test_measured_height_overrides_screen_height() {
        let layout = LayoutState::compute(
            screen(),
            &DecorationProfile::measured(1044, 0),
            Ratio::new(50, 100),
            0,
        );

        assert_eq!(layout.h_full, 1044);
        assert_eq!(layout.h_half, 522);
        assert_eq!(layout.y_bottom, 522);
    }

    #[test]
    fn test_panel_inset_shifts_bottom_row() {
        // 36px top bar: workarea is 1044 high on a 1080 screen
        let layout = LayoutState::compute(
            screen(),
            &DecorationProfile::measured(1044, 0),
            Ratio::new(40, 100),
            36,
        );

        assert_eq!(layout.h_half, 522);
        assert_eq!(layout.y_bottom, 558);
        assert_eq!(layout.panel_inset, 36);
    }

    #[test]
    fn test_decorations_shrink_rows() {
        let layout = LayoutState::compute(
            screen(),
            &DecorationProfile::measured(1044, 37),
            Ratio::new(40, 100),
            0,
        );

        // (1044 - 37) / 2 floors to 503
        assert_eq!(layout.h_half, 503);
        assert_eq!(layout.h_decor, 37);
        assert_eq!(layout.y_bottom, 1044 - 503);
    }

    #[test]
    fn test_pinned_outputs_for_every_ratio() {
        // (w_center, w_side, x_right, x_center) on a 1920px screen
        let expected = [
            (0, 960, 960, 960),
            (640, 640, 1280, 640),
            (768, 576, 1344, 576),
            (864, 528, 1392, 528),
            (960, 480, 1440, 480),
            (1056, 432, 1488, 432),
            (1152, 384, 1536, 384),
            (1248, 336, 1584, 336),
        ];

        let table = RatioTable::standard();
        for (index, (w_center, w_side, x_right, x_center)) in expected.into_iter().enumerate() {
            let layout =
                LayoutState::compute(screen(), &DecorationProfile::default(), table.ratio_at(index), 0);
            assert_eq!(layout.w_center, w_center, "w_center at index {index}");
            assert_eq!(layout.w_side, w_side, "w_side at index {index}");
            assert_eq!(layout.x_right, x_right, "x_right at index {index}");
            assert_eq!(layout.x_center, x_center, "x_center at index {index}");
        }
    }

    #[test]
    fn test_right_column_reaches_screen_edge() {
        let table = RatioTable::standard();
        for width in [1000, 1366, 1920, 2560, 3441] {
            let geometry = ScreenGeometry::new(width, 1080);
            for ratio in table.iter() {
                let layout = LayoutState::compute(geometry, &DecorationProfile::default(), ratio, 0);
                assert_eq!(layout.x_right + layout.w_side, width, "width {width}, ratio {ratio}");
                assert!(layout.w_side * 2 + layout.w_center <= width);
            }
        }
    }

    #[test]
    fn test_zero_ratio_collapses_to_two_columns() {
        let layout =
            LayoutState::compute(screen(), &DecorationProfile::default(), Ratio::ZERO, 0);

        assert!(!layout.has_center());
        assert_eq!(layout.w_side, 960);
        assert_eq!(layout.x_right, 960);
    }

    #[test]
    fn test_degenerate_screen_is_well_defined() {
        let layout = LayoutState::compute(
            ScreenGeometry::new(0, 0),
            &DecorationProfile::default(),
            Ratio::new(50, 100),
            0,
        );

        assert_eq!(layout, LayoutState::default());
    }
}
