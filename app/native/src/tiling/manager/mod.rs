//! Per-action tiling session.
//!
//! A [`TilingSession`] is built for every action (every chord firing in the
//! daemon) over a window-system connection that outlives it. Building the
//! session refreshes everything the layout depends on: the screen size, the
//! active desktop and window, the decoration profile (calibrated against the
//! active window), the panel inset and the desktop's ratio selection.
//!
//! There is no global manager: two sessions never share cached state except
//! through the [`StateStore`].

use serde::Serialize;

use super::action::Action;
use super::backend::WindowSystem;
use super::constants::{classify as classify_consts, ratio as ratio_consts, state_keys};
use super::error::{TilingError, TilingResult};
use super::layout::{
    Classification, LayoutState, Ratio, RatioTable, Zone, classify, compensate_client_side,
};
use super::state::{DecorationProfile, DesktopId, Rect, ScreenGeometry, WindowHandle};
use super::store::{StateStore, load_decoration_profile, load_ratio_index, save_ratio_index};

// ============================================================================
// Types
// ============================================================================

/// Tunables applied to every session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Classification tolerance in pixels.
    pub deviation: i32,
    /// Ratio index for desktops without a stored selection.
    pub default_ratio_index: usize,
    /// Whether the workarea-derived panel inset shifts the bottom row.
    pub panel_compensation: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            deviation: classify_consts::DEFAULT_DEVIATION_PX,
            default_ratio_index: ratio_consts::DEFAULT_INDEX,
            panel_compensation: true,
        }
    }
}

/// One row of the window listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowReport {
    /// Window handle.
    pub window: WindowHandle,
    /// Window title.
    pub title: String,
    /// Raw classification label (e.g. `top-unknown`).
    pub zone: String,
    /// Whether the classification resolved to a known zone.
    pub tiled: bool,
    /// Current rectangle.
    pub rect: Rect,
}

/// Summary of a desktop re-tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetileSummary {
    /// Ratio index selected after the step.
    pub ratio_index: usize,
    /// Windows found on the desktop.
    pub windows: usize,
    /// Windows that were replayed into a zone.
    pub placed: usize,
}

/// Result of a dispatched action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The active window was placed into a zone.
    Placed { window: WindowHandle, zone: Zone },
    /// The zone does not exist in the current layout; nothing was changed.
    Skipped { window: WindowHandle, zone: Zone },
    /// The center column was resized and the desktop re-tiled.
    Retiled(RetileSummary),
    /// Windows on the active desktop.
    Listed(Vec<WindowReport>),
}

// ============================================================================
// Tiling Session
// ============================================================================

/// Layout context for one action.
pub struct TilingSession<'a, W: WindowSystem, S: StateStore> {
    ws: &'a mut W,
    store: &'a mut S,
    options: SessionOptions,
    table: RatioTable,
    geometry: ScreenGeometry,
    desktop: DesktopId,
    active: Option<WindowHandle>,
    decoration: DecorationProfile,
    panel_inset: i32,
    ratio_index: usize,
    layout: LayoutState,
}

impl<'a, W: WindowSystem, S: StateStore> TilingSession<'a, W, S> {
    /// Builds a session and refreshes its layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the window system cannot be queried, or if a
    /// changed calibration cannot be persisted.
    pub fn begin(ws: &'a mut W, store: &'a mut S, options: SessionOptions) -> TilingResult<Self> {
        let geometry = ws.screen_size()?;
        let desktop = ws.active_desktop()?;
        let active = ws.active_window()?;
        let decoration = load_decoration_profile(&*store);

        let table = RatioTable::standard();
        let ratio_index = load_ratio_index(&*store, desktop).map_or_else(
            || table.wrap(i64::try_from(options.default_ratio_index).unwrap_or(0)),
            |stored| table.wrap(i64::try_from(stored).unwrap_or(0)),
        );

        let mut session = Self {
            ws,
            store,
            options,
            table,
            geometry,
            desktop,
            active,
            decoration,
            panel_inset: 0,
            ratio_index,
            layout: LayoutState::default(),
        };

        if let Some(window) = active {
            match session.calibrate(window) {
                Ok(_) => {}
                Err(err) if err.is_not_found() => {
                    tracing::debug!(window, error = %err, "tiling: active window vanished before calibration");
                }
                Err(err) => return Err(err),
            }
        }

        if options.panel_compensation {
            session.panel_inset = session.ws.panel_inset()?;
        }

        session.recompute();

        tracing::debug!(
            desktop,
            ratio_index,
            width = geometry.width,
            height = geometry.height,
            panel_inset = session.panel_inset,
            "tiling: session ready"
        );

        Ok(session)
    }

    /// Returns the current layout.
    #[must_use]
    pub const fn layout(&self) -> &LayoutState { &self.layout }

    /// Returns the selected ratio index on the active desktop.
    #[must_use]
    pub const fn ratio_index(&self) -> usize { self.ratio_index }

    /// Returns the selected center-column ratio on the active desktop.
    #[must_use]
    pub const fn ratio(&self) -> Ratio { self.table.ratio_at(self.ratio_index) }

    /// Returns the decoration profile in effect.
    #[must_use]
    pub const fn decoration(&self) -> DecorationProfile { self.decoration }

    fn recompute(&mut self) {
        self.layout =
            LayoutState::compute(self.geometry, &self.decoration, self.ratio(), self.panel_inset);
    }

    /// Learns the decoration profile from a vertically maximized window.
    ///
    /// Windows that draw client-side decorations are skipped: their reported
    /// height includes shadows. Values are persisted only when they changed.
    ///
    /// # Returns
    ///
    /// `true` if the profile changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be queried or the store cannot
    /// be written.
    pub fn calibrate(&mut self, window: WindowHandle) -> TilingResult<bool> {
        if !self.ws.is_maximized_vertically(window)?
            || self.ws.client_side_extents(window)?.is_some()
        {
            return Ok(false);
        }

        let height = self.ws.window_rect(window)?.height;
        let decoration = self.ws.frame_extents(window)?.map_or(0, |extents| extents.vertical());
        let mut changed = false;

        if self.decoration.measured_height != Some(height) {
            self.store.put(state_keys::MEASURED_HEIGHT, height.into())?;
            self.decoration.measured_height = Some(height);
            changed = true;
        }

        if self.decoration.measured_decoration_px != decoration {
            self.store.put(state_keys::MEASURED_DECORATIONS, decoration.into())?;
            self.decoration.measured_decoration_px = decoration;
            changed = true;
        }

        if changed {
            tracing::info!(window, height, decoration, "tiling: calibrated decoration profile");
            self.recompute();
        }

        Ok(changed)
    }

    /// Runs an action inside a server grab.
    ///
    /// The server is always ungrabbed and the connection flushed, even when
    /// the action fails.
    ///
    /// # Errors
    ///
    /// Returns the action's error, or the ungrab/flush error if the action
    /// itself succeeded.
    pub fn perform(&mut self, action: Action) -> TilingResult<ActionOutcome> {
        self.ws.grab_server()?;

        let result = self.dispatch(action);
        let ungrabbed = self.ws.ungrab_server();
        let flushed = self.ws.flush();

        let outcome = result?;
        ungrabbed?;
        flushed?;
        Ok(outcome)
    }

    fn dispatch(&mut self, action: Action) -> TilingResult<ActionOutcome> {
        if let Some(zone) = action.target_zone() {
            let window = self.active.ok_or(TilingError::NoActiveWindow)?;
            return if self.place(window, zone)? {
                Ok(ActionOutcome::Placed { window, zone })
            } else {
                Ok(ActionOutcome::Skipped { window, zone })
            };
        }

        if let Some(step) = action.ratio_step() {
            return self.resize_all(step).map(ActionOutcome::Retiled);
        }

        self.window_report().map(ActionOutcome::Listed)
    }

    /// Places a window into a zone of the current layout.
    ///
    /// Maximize flags are sent before the move so the window manager does not
    /// override the requested rectangle.
    ///
    /// # Returns
    ///
    /// `false` if the zone is a no-op in this layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be queried or moved.
    pub fn place(&mut self, window: WindowHandle, zone: Zone) -> TilingResult<bool> {
        let Some(placement) = zone.placement(&self.layout) else {
            tracing::debug!(window, %zone, "tiling: zone not available in this layout");
            return Ok(false);
        };

        self.ws.set_maximize_flags(window, placement.maximize)?;

        if let Some(rect) = placement.rect {
            let rect = match self.ws.client_side_extents(window)? {
                Some(extents) => compensate_client_side(rect, extents, self.layout.h_decor),
                None => rect,
            };
            self.ws.move_resize(window, rect)?;
        }

        tracing::debug!(window, %zone, "tiling: placed window");
        Ok(true)
    }

    /// Classifies a window against the current layout.
    ///
    /// # Errors
    ///
    /// Returns an error if the window cannot be queried.
    pub fn classify_window(&self, window: WindowHandle) -> TilingResult<Classification> {
        let rect = self.ws.window_rect(window)?;
        let is_vmax = self.ws.is_maximized_vertically(window)?;
        Ok(classify(rect, is_vmax, &self.layout, self.options.deviation))
    }

    /// Steps the center-column ratio and replays every tiled window.
    ///
    /// Zones are captured against the old layout before the ratio changes.
    /// Windows that disappear mid-way are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the window list cannot be read, the new ratio
    /// cannot be persisted, or a window cannot be moved.
    pub fn resize_all(&mut self, step: i32) -> TilingResult<RetileSummary> {
        let windows = self.ws.list_windows(self.desktop)?;

        let mut snapshot = Vec::with_capacity(windows.len());
        for &window in &windows {
            match self.classify_window(window) {
                Ok(classification) => snapshot.push((window, classification.zone())),
                Err(err) if err.is_not_found() => {
                    tracing::debug!(window, "tiling: skipping vanished window");
                }
                Err(err) => return Err(err),
            }
        }

        let ratio_index = self.table.step(self.ratio_index, step);
        save_ratio_index(&mut *self.store, self.desktop, ratio_index)?;
        self.ratio_index = ratio_index;
        self.recompute();

        let collapse_center = self.ratio().is_zero();
        let mut placed = 0;

        for (window, zone) in snapshot {
            let zone = if collapse_center { zone.without_center() } else { zone };
            if !zone.is_known() {
                continue;
            }

            match self.place(window, zone) {
                Ok(true) => placed += 1,
                Ok(false) => {}
                Err(err) if err.is_not_found() => {
                    tracing::debug!(window, "tiling: window vanished during re-tile");
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            desktop = self.desktop,
            ratio_index,
            ratio = %self.ratio(),
            windows = windows.len(),
            placed,
            "tiling: re-tiled desktop"
        );

        Ok(RetileSummary { ratio_index, windows: windows.len(), placed })
    }

    /// Lists the windows on the active desktop with their classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the window list cannot be read.
    pub fn window_report(&self) -> TilingResult<Vec<WindowReport>> {
        let mut reports = Vec::new();

        for window in self.ws.list_windows(self.desktop)? {
            let row = self.classify_window(window).and_then(|classification| {
                Ok(WindowReport {
                    window,
                    title: self.ws.window_title(window)?,
                    zone: classification.to_string(),
                    tiled: classification.zone().is_known(),
                    rect: self.ws.window_rect(window)?,
                })
            });

            match row {
                Ok(row) => reports.push(row),
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }

        Ok(reports)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::tiling::layout::MaximizeFlags;
    use crate::tiling::state::FrameExtents;
    use crate::tiling::store::MemoryStateStore;

    #[derive(Debug, Clone, Default)]
    struct FakeWindow {
        rect: Rect,
        vmax: bool,
        frame: Option<FrameExtents>,
        gtk: Option<FrameExtents>,
    }

    #[derive(Debug, Default)]
    struct FakeWindowSystem {
        windows: HashMap<WindowHandle, FakeWindow>,
        stacking: Vec<WindowHandle>,
        active: Option<WindowHandle>,
        workarea_height: Option<i32>,
        log: Vec<String>,
        fail_moves: bool,
    }

    impl FakeWindowSystem {
        fn add(&mut self, id: WindowHandle, window: FakeWindow) {
            self.windows.insert(id, window);
            self.stacking.push(id);
        }

        fn get(&self, id: WindowHandle) -> TilingResult<&FakeWindow> {
            self.windows.get(&id).ok_or(TilingError::WindowNotFound(id))
        }
    }

    impl WindowSystem for FakeWindowSystem {
        fn screen_size(&self) -> TilingResult<ScreenGeometry> {
            Ok(ScreenGeometry::new(1920, 1080))
        }

        fn active_desktop(&self) -> TilingResult<DesktopId> { Ok(0) }

        fn active_window(&self) -> TilingResult<Option<WindowHandle>> { Ok(self.active) }

        fn list_windows(&self, _desktop: DesktopId) -> TilingResult<Vec<WindowHandle>> {
            Ok(self.stacking.clone())
        }

        fn window_rect(&self, window: WindowHandle) -> TilingResult<Rect> {
            Ok(self.get(window)?.rect)
        }

        fn is_maximized_vertically(&self, window: WindowHandle) -> TilingResult<bool> {
            Ok(self.get(window)?.vmax)
        }

        fn frame_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>> {
            Ok(self.get(window)?.frame)
        }

        fn client_side_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>> {
            Ok(self.get(window)?.gtk)
        }

        fn panel_inset(&self) -> TilingResult<i32> {
            Ok(self.workarea_height.map_or(0, |h| 1080 - h))
        }

        fn window_title(&self, window: WindowHandle) -> TilingResult<String> {
            self.get(window)?;
            Ok(format!("window-{window}"))
        }

        fn move_resize(&mut self, window: WindowHandle, rect: Rect) -> TilingResult<()> {
            if self.fail_moves {
                return Err(TilingError::protocol("BadMatch"));
            }
            self.log.push(format!("move {window} {rect}"));
            self.windows.get_mut(&window).ok_or(TilingError::WindowNotFound(window))?.rect = rect;
            Ok(())
        }

        fn set_maximize_flags(
            &mut self,
            window: WindowHandle,
            flags: MaximizeFlags,
        ) -> TilingResult<()> {
            self.log.push(format!("max {window} {} {}", flags.vertical, flags.horizontal));
            self.windows.get_mut(&window).ok_or(TilingError::WindowNotFound(window))?.vmax =
                flags.vertical;
            Ok(())
        }

        fn grab_server(&mut self) -> TilingResult<()> {
            self.log.push("grab".to_string());
            Ok(())
        }

        fn ungrab_server(&mut self) -> TilingResult<()> {
            self.log.push("ungrab".to_string());
            Ok(())
        }

        fn flush(&mut self) -> TilingResult<()> {
            self.log.push("flush".to_string());
            Ok(())
        }
    }

    fn floating(rect: Rect) -> FakeWindow { FakeWindow { rect, ..FakeWindow::default() } }

    #[test]
    fn test_default_ratio_index_for_new_desktop() {
        let mut ws = FakeWindowSystem::default();
        let mut store = MemoryStateStore::new();
        let session = TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();

        assert_eq!(session.ratio_index(), 2);
        assert_eq!(session.layout().w_center, 768);
    }

    #[test]
    fn test_stale_stored_index_wraps() {
        let mut ws = FakeWindowSystem::default();
        let mut store = MemoryStateStore::new();
        store.put("ratio_idx_0", 10.into()).unwrap();

        let session = TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert_eq!(session.ratio_index(), 2);
    }

    #[test]
    fn test_place_sends_flags_before_move() {
        let mut ws = FakeWindowSystem::default();
        ws.add(7, floating(Rect::new(100, 100, 300, 300)));
        ws.active = Some(7);
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let outcome = session.perform(Action::Left).unwrap();
        assert_eq!(outcome, ActionOutcome::Placed { window: 7, zone: Zone::Left });

        assert_eq!(
            ws.log,
            vec!["grab", "max 7 true false", "move 7 (0,0) 576x1080", "ungrab", "flush"]
        );
    }

    #[test]
    fn test_center_is_skipped_without_center_column() {
        let mut ws = FakeWindowSystem::default();
        ws.add(7, floating(Rect::new(100, 100, 300, 300)));
        ws.active = Some(7);
        let mut store = MemoryStateStore::new();
        store.put("ratio_idx_0", 0.into()).unwrap();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let outcome = session.perform(Action::TopCenter).unwrap();

        assert_eq!(outcome, ActionOutcome::Skipped { window: 7, zone: Zone::TopCenter });
        assert_eq!(ws.log, vec!["grab", "ungrab", "flush"]);
    }

    #[test]
    fn test_window_action_without_active_window() {
        let mut ws = FakeWindowSystem::default();
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let err = session.perform(Action::Max).unwrap_err();

        assert!(matches!(err, TilingError::NoActiveWindow));
        assert_eq!(ws.log, vec!["grab", "ungrab", "flush"]);
    }

    #[test]
    fn test_failed_action_still_ungrabs() {
        let mut ws = FakeWindowSystem::default();
        ws.add(7, floating(Rect::new(100, 100, 300, 300)));
        ws.active = Some(7);
        ws.fail_moves = true;
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert!(session.perform(Action::Right).is_err());
        assert_eq!(ws.log.last().map(String::as_str), Some("flush"));
        assert!(ws.log.contains(&"ungrab".to_string()));
    }

    #[test]
    fn test_calibration_persists_only_changes() {
        let mut ws = FakeWindowSystem::default();
        ws.add(
            3,
            FakeWindow {
                rect: Rect::new(0, 36, 960, 1044),
                vmax: true,
                frame: Some(FrameExtents::new(0, 0, 30, 7)),
                gtk: None,
            },
        );
        ws.active = Some(3);
        let mut store = MemoryStateStore::new();

        let session = TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert_eq!(session.decoration(), DecorationProfile::measured(1044, 37));
        assert_eq!(session.layout().h_full, 1044);
        assert_eq!(store.writes(), 2);

        let _ = TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn test_client_side_windows_are_not_measured() {
        let mut ws = FakeWindowSystem::default();
        ws.add(
            3,
            FakeWindow {
                rect: Rect::new(0, 0, 960, 1100),
                vmax: true,
                frame: None,
                gtk: Some(FrameExtents::new(20, 20, 10, 30)),
            },
        );
        ws.active = Some(3);
        let mut store = MemoryStateStore::new();

        let session = TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert_eq!(session.decoration(), DecorationProfile::default());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_client_side_placement_is_compensated() {
        let mut ws = FakeWindowSystem::default();
        ws.add(
            5,
            FakeWindow { gtk: Some(FrameExtents::new(10, 10, 5, 15)), ..FakeWindow::default() },
        );
        ws.active = Some(5);
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        session.perform(Action::BottomRight).unwrap();

        // 40% ratio: side columns are 576 wide, rows 540 high
        assert_eq!(ws.windows[&5].rect, Rect::new(1344 - 10, 540, 576 + 20, 540 + 20));
    }

    #[test]
    fn test_panel_compensation_toggle() {
        let mut ws = FakeWindowSystem { workarea_height: Some(1044), ..Default::default() };
        let mut store = MemoryStateStore::new();

        let with_panel =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        assert_eq!(with_panel.layout().y_bottom, 576);

        let options = SessionOptions { panel_compensation: false, ..SessionOptions::default() };
        let without_panel = TilingSession::begin(&mut ws, &mut store, options).unwrap();
        assert_eq!(without_panel.layout().y_bottom, 540);
    }

    #[test]
    fn test_bigger_keeps_top_right_in_place() {
        let mut ws = FakeWindowSystem::default();
        // top-right at the default 40% ratio
        ws.add(1, floating(Rect::new(1344, 0, 576, 540)));
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let ActionOutcome::Retiled(summary) = session.perform(Action::Bigger).unwrap() else {
            panic!("expected a re-tile");
        };

        assert_eq!(summary, RetileSummary { ratio_index: 3, windows: 1, placed: 1 });
        assert_eq!(ws.windows[&1].rect, Rect::new(1392, 0, 528, 540));
        assert_eq!(load_ratio_index(&store, 0), Some(3));
    }

    #[test]
    fn test_unknown_windows_are_left_alone() {
        let mut ws = FakeWindowSystem::default();
        let original = Rect::new(700, 300, 600, 400);
        ws.add(1, floating(original));
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let summary = session.resize_all(-1).unwrap();

        assert_eq!(summary.placed, 0);
        assert_eq!(ws.windows[&1].rect, original);
    }

    #[test]
    fn test_list_reports_raw_labels() {
        let mut ws = FakeWindowSystem::default();
        ws.add(1, floating(Rect::new(0, 0, 576, 540)));
        ws.add(2, floating(Rect::new(0, 0, 1200, 540)));
        let mut store = MemoryStateStore::new();

        let mut session =
            TilingSession::begin(&mut ws, &mut store, SessionOptions::default()).unwrap();
        let ActionOutcome::Listed(rows) = session.perform(Action::List).unwrap() else {
            panic!("expected a listing");
        };

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].zone, "top-left");
        assert!(rows[0].tiled);
        assert_eq!(rows[0].title, "window-1");
        assert_eq!(rows[1].zone, "top-unknown");
        assert!(!rows[1].tiled);
    }
}
