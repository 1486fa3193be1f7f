//! [`WindowSystem`] over an `x11rb` connection.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, Window,
};
use x11rb::rust_connection::RustConnection;

use super::atoms::Atoms;
use crate::tiling::backend::{UNKNOWN_TITLE, WindowSystem};
use crate::tiling::error::{TilingError, TilingResult};
use crate::tiling::layout::MaximizeFlags;
use crate::tiling::state::{DesktopId, FrameExtents, Rect, ScreenGeometry, WindowHandle};

/// Longest property value requested, in 32-bit units.
const MAX_PROPERTY_LENGTH: u32 = 4096;

/// `_NET_WM_STATE` client message actions.
const NET_WM_STATE_REMOVE: u32 = 0;
const NET_WM_STATE_ADD: u32 = 1;

/// Connection to the X server used for tiling.
pub struct X11Session {
    conn: RustConnection,
    root: Window,
    screen: ScreenGeometry,
    atoms: Atoms,
}

impl X11Session {
    /// Connects to the display named by `$DISPLAY` and interns all atoms.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::CollaboratorUnavailable`] if the display cannot
    /// be reached.
    pub fn connect() -> TilingResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let screen = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| TilingError::unavailable(format!("screen {screen_num} not found")))?;

        let root = screen.root;
        let geometry = ScreenGeometry::new(
            i32::from(screen.width_in_pixels),
            i32::from(screen.height_in_pixels),
        );
        let atoms = Atoms::new(&conn)?.reply()?;

        tracing::debug!(
            root,
            width = geometry.width,
            height = geometry.height,
            "x11: connected"
        );

        Ok(Self { conn, root, screen: geometry, atoms })
    }

    /// Reads a 32-bit property, returning `None` when it is not set.
    fn cardinals(&self, window: Window, property: Atom) -> TilingResult<Option<Vec<u32>>> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ANY, 0, MAX_PROPERTY_LENGTH)?
            .reply()?;

        Ok(reply.value32().map(Iterator::collect))
    }

    fn first_cardinal(&self, window: Window, property: Atom) -> TilingResult<Option<u32>> {
        Ok(self.cardinals(window, property)?.and_then(|values| values.first().copied()))
    }

    fn text(&self, window: Window, property: Atom, type_: Atom) -> TilingResult<Option<String>> {
        let reply = self
            .conn
            .get_property(false, window, property, type_, 0, MAX_PROPERTY_LENGTH)?
            .reply()?;

        if reply.value.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&reply.value).into_owned()))
    }

    fn window_desktop(&self, window: Window) -> TilingResult<Option<DesktopId>> {
        self.first_cardinal(window, self.atoms._NET_WM_DESKTOP)
    }

    fn send_wm_state(&self, window: Window, add: bool, state: Atom) -> TilingResult<()> {
        let action = if add { NET_WM_STATE_ADD } else { NET_WM_STATE_REMOVE };
        let event = ClientMessageEvent::new(
            32,
            window,
            self.atoms._NET_WM_STATE,
            [action, state, 0, 0, 0],
        );

        self.conn.send_event(
            false,
            self.root,
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
            event,
        )?;
        Ok(())
    }
}

impl WindowSystem for X11Session {
    fn screen_size(&self) -> TilingResult<ScreenGeometry> { Ok(self.screen) }

    fn active_desktop(&self) -> TilingResult<DesktopId> {
        Ok(self.first_cardinal(self.root, self.atoms._NET_CURRENT_DESKTOP)?.unwrap_or(0))
    }

    fn active_window(&self) -> TilingResult<Option<WindowHandle>> {
        Ok(self
            .first_cardinal(self.root, self.atoms._NET_ACTIVE_WINDOW)?
            .filter(|window| *window != x11rb::NONE))
    }

    fn list_windows(&self, desktop: DesktopId) -> TilingResult<Vec<WindowHandle>> {
        let windows = match self.cardinals(self.root, self.atoms._NET_CLIENT_LIST_STACKING)? {
            Some(windows) => windows,
            None => self.cardinals(self.root, self.atoms._NET_CLIENT_LIST)?.unwrap_or_default(),
        };

        let mut on_desktop = Vec::with_capacity(windows.len());
        for window in windows {
            match self.window_desktop(window) {
                Ok(Some(d)) if d == desktop => on_desktop.push(window),
                Ok(_) => {}
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }
        }

        Ok(on_desktop)
    }

    fn window_rect(&self, window: WindowHandle) -> TilingResult<Rect> {
        let geometry = self.conn.get_geometry(window)?.reply()?;
        let origin = self.conn.translate_coordinates(window, self.root, 0, 0)?.reply()?;

        Ok(Rect::new(
            i32::from(origin.dst_x),
            i32::from(origin.dst_y),
            i32::from(geometry.width),
            i32::from(geometry.height),
        ))
    }

    fn is_maximized_vertically(&self, window: WindowHandle) -> TilingResult<bool> {
        Ok(self
            .cardinals(window, self.atoms._NET_WM_STATE)?
            .is_some_and(|states| states.contains(&self.atoms._NET_WM_STATE_MAXIMIZED_VERT)))
    }

    fn frame_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>> {
        Ok(self
            .cardinals(window, self.atoms._NET_FRAME_EXTENTS)?
            .and_then(|values| FrameExtents::from_cardinals(&values)))
    }

    fn client_side_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>> {
        Ok(self
            .cardinals(window, self.atoms._GTK_FRAME_EXTENTS)?
            .and_then(|values| FrameExtents::from_cardinals(&values)))
    }

    fn panel_inset(&self) -> TilingResult<i32> {
        let workarea = self.cardinals(self.root, self.atoms._NET_WORKAREA)?;

        // x, y, width, height for the first desktop
        Ok(workarea
            .and_then(|values| values.get(3).copied())
            .and_then(|height| i32::try_from(height).ok())
            .map_or(0, |height| self.screen.height - height))
    }

    fn window_title(&self, window: WindowHandle) -> TilingResult<String> {
        if let Some(title) = self.text(window, self.atoms._NET_WM_NAME, self.atoms.UTF8_STRING)? {
            return Ok(title);
        }

        Ok(self
            .text(window, AtomEnum::WM_NAME.into(), AtomEnum::STRING.into())?
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()))
    }

    fn move_resize(&mut self, window: WindowHandle, rect: Rect) -> TilingResult<()> {
        let mut aux = ConfigureWindowAux::new().x(rect.x).y(rect.y);
        if let Ok(width) = u32::try_from(rect.width)
            && width > 0
        {
            aux = aux.width(width);
        }
        if let Ok(height) = u32::try_from(rect.height)
            && height > 0
        {
            aux = aux.height(height);
        }

        self.conn.configure_window(window, &aux)?;
        Ok(())
    }

    fn set_maximize_flags(
        &mut self,
        window: WindowHandle,
        flags: MaximizeFlags,
    ) -> TilingResult<()> {
        self.send_wm_state(window, flags.vertical, self.atoms._NET_WM_STATE_MAXIMIZED_VERT)?;
        self.send_wm_state(window, flags.horizontal, self.atoms._NET_WM_STATE_MAXIMIZED_HORZ)
    }

    fn grab_server(&mut self) -> TilingResult<()> {
        self.conn.grab_server()?;
        Ok(())
    }

    fn ungrab_server(&mut self) -> TilingResult<()> {
        self.conn.ungrab_server()?;
        Ok(())
    }

    fn flush(&mut self) -> TilingResult<()> {
        self.conn.flush()?;
        Ok(())
    }
}
