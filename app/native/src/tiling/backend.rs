//! Window-system collaborator used by the tiling session.
//!
//! The session never talks to the X server directly. Everything it reads or
//! changes goes through [`WindowSystem`], which the X11 platform layer
//! implements over an `x11rb` connection and tests implement in memory.
//!
//! Queries take `&self`; requests that change server state take `&mut self`.
//! Optional properties are reported as `None` (or a neutral default) rather
//! than as errors.

use super::error::TilingResult;
use super::layout::MaximizeFlags;
use super::state::{DesktopId, FrameExtents, Rect, ScreenGeometry, WindowHandle};

/// Title reported for windows that carry neither `_NET_WM_NAME` nor `WM_NAME`.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Access to the windows of an EWMH-compliant desktop.
pub trait WindowSystem {
    /// Returns the size of the root window.
    ///
    /// # Errors
    ///
    /// Returns an error if the windowing system cannot be reached.
    fn screen_size(&self) -> TilingResult<ScreenGeometry>;

    /// Returns the active desktop (`_NET_CURRENT_DESKTOP`), 0 when unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn active_desktop(&self) -> TilingResult<DesktopId>;

    /// Returns the focused window (`_NET_ACTIVE_WINDOW`), if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn active_window(&self) -> TilingResult<Option<WindowHandle>>;

    /// Lists the windows on `desktop`, back to front when the window manager
    /// publishes a stacking order.
    ///
    /// # Errors
    ///
    /// Returns an error if the client list cannot be read.
    fn list_windows(&self, desktop: DesktopId) -> TilingResult<Vec<WindowHandle>>;

    /// Returns the window's rectangle in root coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TilingError::WindowNotFound`](super::error::TilingError::WindowNotFound)
    /// if the window no longer exists.
    fn window_rect(&self, window: WindowHandle) -> TilingResult<Rect>;

    /// Returns `true` if `_NET_WM_STATE` contains `_NET_WM_STATE_MAXIMIZED_VERT`.
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn is_maximized_vertically(&self, window: WindowHandle) -> TilingResult<bool>;

    /// Returns the server-side decoration extents (`_NET_FRAME_EXTENTS`).
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn frame_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>>;

    /// Returns the client-side shadow extents (`_GTK_FRAME_EXTENTS`).
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn client_side_extents(&self, window: WindowHandle) -> TilingResult<Option<FrameExtents>>;

    /// Returns the screen height minus the `_NET_WORKAREA` height, 0 when the
    /// work area is not published.
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn panel_inset(&self) -> TilingResult<i32>;

    /// Returns the window title, falling back to [`UNKNOWN_TITLE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the property request fails.
    fn window_title(&self, window: WindowHandle) -> TilingResult<String>;

    /// Moves and resizes a window. Non-positive dimensions are left unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    fn move_resize(&mut self, window: WindowHandle, rect: Rect) -> TilingResult<()>;

    /// Sets both maximize flags through `_NET_WM_STATE` client messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the messages cannot be sent.
    fn set_maximize_flags(&mut self, window: WindowHandle, flags: MaximizeFlags)
    -> TilingResult<()>;

    /// Grabs the server so a multi-window update is applied atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    fn grab_server(&mut self) -> TilingResult<()>;

    /// Releases a server grab.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    fn ungrab_server(&mut self) -> TilingResult<()>;

    /// Flushes buffered requests to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is broken.
    fn flush(&mut self) -> TilingResult<()>;
}
