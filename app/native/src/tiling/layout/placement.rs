//! Placement dispatch: zone to target rectangle and maximize flags.

use serde::Serialize;

use super::{LayoutState, Zone};
use crate::tiling::state::{FrameExtents, Rect};

/// `_NET_WM_STATE` maximize flags requested for a placement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MaximizeFlags {
    /// `_NET_WM_STATE_MAXIMIZED_VERT`
    pub vertical: bool,
    /// `_NET_WM_STATE_MAXIMIZED_HORZ`
    pub horizontal: bool,
}

impl MaximizeFlags {
    /// Neither axis maximized.
    pub const NONE: Self = Self { vertical: false, horizontal: false };

    /// Vertically maximized only.
    pub const VERTICAL: Self = Self { vertical: true, horizontal: false };

    /// Maximized on both axes.
    pub const BOTH: Self = Self { vertical: true, horizontal: true };
}

/// What a placement action asks of the window system.
///
/// The maximize flags are applied first; the rectangle, when present, is
/// applied afterwards so the window manager does not override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// Target rectangle, or `None` to leave geometry to the window manager.
    pub rect: Option<Rect>,
    /// Maximize flags to set before moving.
    pub maximize: MaximizeFlags,
}

impl Placement {
    const fn tiled(rect: Rect, maximize: MaximizeFlags) -> Self {
        Self { rect: Some(rect), maximize }
    }

    const fn flags_only(maximize: MaximizeFlags) -> Self { Self { rect: None, maximize } }
}

impl Zone {
    /// Returns the placement for this zone under `layout`.
    ///
    /// # Returns
    ///
    /// `None` when placing into this zone is a no-op: for [`Zone::Unknown`],
    /// and for the center-column zones when the layout has no center column.
    #[must_use]
    pub const fn placement(&self, layout: &LayoutState) -> Option<Placement> {
        let l = layout;

        if self.is_center() && !l.has_center() {
            return None;
        }

        let placement = match self {
            Self::Left => Placement::tiled(
                Rect::new(l.x_left, l.y_top, l.w_side, l.h_full),
                MaximizeFlags::VERTICAL,
            ),
            Self::Right => Placement::tiled(
                Rect::new(l.x_right, l.y_top, l.w_side, l.h_full),
                MaximizeFlags::VERTICAL,
            ),
            Self::Center => Placement::tiled(
                Rect::new(l.x_center, l.y_top, l.w_center, l.h_full),
                MaximizeFlags::VERTICAL,
            ),
            Self::TopLeft => Placement::tiled(
                Rect::new(l.x_left, l.y_top, l.w_side, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::TopRight => Placement::tiled(
                Rect::new(l.x_right, l.y_top, l.w_side, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::TopCenter => Placement::tiled(
                Rect::new(l.x_center, l.y_top, l.w_center, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::BottomLeft => Placement::tiled(
                Rect::new(l.x_left, l.y_bottom, l.w_side, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::BottomRight => Placement::tiled(
                Rect::new(l.x_right, l.y_bottom, l.w_side, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::BottomCenter => Placement::tiled(
                Rect::new(l.x_center, l.y_bottom, l.w_center, l.h_half),
                MaximizeFlags::NONE,
            ),
            Self::Full => Placement::flags_only(MaximizeFlags::BOTH),
            Self::Restored => Placement::flags_only(MaximizeFlags::NONE),
            Self::Unknown => return None,
        };

        Some(placement)
    }
}

/// Grows a target rectangle to cover client-side shadows and padding.
///
/// Windows drawing their own decorations report `_GTK_FRAME_EXTENTS`; the
/// visible frame is smaller than the X window by those extents, so the
/// requested rectangle is enlarged and shifted left by half the width growth
/// to keep the visible frame centered on the zone.
///
/// # Arguments
///
/// * `rect` - Zone rectangle from [`Zone::placement`]
/// * `extents` - The window's `_GTK_FRAME_EXTENTS`
/// * `h_decor` - Measured decoration height from the layout
#[must_use]
pub const fn compensate_client_side(rect: Rect, extents: FrameExtents, h_decor: i32) -> Rect {
    let grow_w = extents.horizontal();
    let grow_h = extents.vertical() + h_decor;

    Rect::new(rect.x - grow_w / 2, rect.y, rect.width + grow_w, rect.height + grow_h)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::layout::Ratio;
    use crate::tiling::state::{DecorationProfile, ScreenGeometry};

    fn layout(ratio: Ratio) -> LayoutState {
        LayoutState::compute(
            ScreenGeometry::new(1920, 1080),
            &DecorationProfile::default(),
            ratio,
            0,
        )
    }

    #[test]
    fn test_column_zones_are_vertically_maximized() {
        let layout = layout(Ratio::new(50, 100));

        let left = Zone::Left.placement(&layout).unwrap();
        assert_eq!(left.rect, Some(Rect::new(0, 0, 480, 1080)));
        assert_eq!(left.maximize, MaximizeFlags::VERTICAL);

        let center = Zone::Center.placement(&layout).unwrap();
        assert_eq!(center.rect, Some(Rect::new(480, 0, 960, 1080)));
        assert_eq!(center.maximize, MaximizeFlags::VERTICAL);
    }

    #[test]
    fn test_quarter_zones_clear_maximize() {
        let layout = layout(Ratio::new(50, 100));

        let bottom_right = Zone::BottomRight.placement(&layout).unwrap();
        assert_eq!(bottom_right.rect, Some(Rect::new(1440, 540, 480, 540)));
        assert_eq!(bottom_right.maximize, MaximizeFlags::NONE);

        let top_center = Zone::TopCenter.placement(&layout).unwrap();
        assert_eq!(top_center.rect, Some(Rect::new(480, 0, 960, 540)));
    }

    #[test]
    fn test_flag_only_zones() {
        let layout = layout(Ratio::new(40, 100));

        let full = Zone::Full.placement(&layout).unwrap();
        assert_eq!(full.rect, None);
        assert_eq!(full.maximize, MaximizeFlags::BOTH);

        let restored = Zone::Restored.placement(&layout).unwrap();
        assert_eq!(restored.rect, None);
        assert_eq!(restored.maximize, MaximizeFlags::NONE);
    }

    #[test]
    fn test_noop_placements() {
        let without_center = layout(Ratio::ZERO);
        assert!(Zone::Center.placement(&without_center).is_none());
        assert!(Zone::TopCenter.placement(&without_center).is_none());
        assert!(Zone::BottomCenter.placement(&without_center).is_none());
        assert!(Zone::Left.placement(&without_center).is_some());

        assert!(Zone::Unknown.placement(&layout(Ratio::new(50, 100))).is_none());
    }

    #[test]
    fn test_client_side_compensation() {
        let rect = Rect::new(480, 540, 960, 540);
        let extents = FrameExtents::new(23, 23, 15, 31);

        let grown = compensate_client_side(rect, extents, 0);
        assert_eq!(grown, Rect::new(457, 540, 1006, 586));

        let with_decor = compensate_client_side(rect, extents, 37);
        assert_eq!(with_decor.height, 540 + 46 + 37);
        assert_eq!(with_decor.y, 540);
    }

    #[test]
    fn test_zero_extents_leave_rect_unchanged() {
        let rect = Rect::new(0, 0, 640, 1080);
        assert_eq!(compensate_client_side(rect, FrameExtents::default(), 0), rect);
    }
}
