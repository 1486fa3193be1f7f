//! [`KeyboardBackend`] over an `x11rb` connection.
//!
//! Passive grabs are registered on the root window. Tap passthrough uses the
//! XTEST extension to synthesize key events. An unmapped input-only window
//! receives the wake message sent by an [`Interrupter`], which lets another
//! thread stop the blocking event loop.

use x11rb::connection::{Connection, RequestConnection as _};
use x11rb::protocol::Event;
use x11rb::protocol::xproto::{
    Atom, ClientMessageEvent, ConnectionExt as _, CreateWindowAux, EventMask, GrabMode,
    KEY_PRESS_EVENT, KEY_RELEASE_EVENT, ModMask, Window, WindowClass,
};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

use super::atoms::Atoms;
use crate::hotkey::{HotkeyError, HotkeyResult, InputEvent, KeyboardBackend, Keycode, ModifierMask};

/// Keyboard connection used by the chord daemon.
pub struct X11Keyboard {
    conn: RustConnection,
    root: Window,
    wake_window: Window,
    wake_atom: Atom,
}

impl X11Keyboard {
    /// Connects to the display and prepares the wake window.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be reached or the XTEST
    /// extension is missing.
    pub fn connect() -> HotkeyResult<Self> {
        let (conn, screen_num) = x11rb::connect(None)?;
        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| HotkeyError::Connection(format!("screen {screen_num} not found")))?;

        if conn.extension_information(xtest::X11_EXTENSION_NAME)?.is_none() {
            return Err(HotkeyError::Protocol("XTEST extension not available".to_string()));
        }

        let atoms = Atoms::new(&conn)?.reply()?;
        let wake_window = conn
            .generate_id()
            .map_err(|err| HotkeyError::Connection(err.to_string()))?;

        conn.create_window(
            0,
            wake_window,
            root,
            -1,
            -1,
            1,
            1,
            0,
            WindowClass::INPUT_ONLY,
            x11rb::COPY_FROM_PARENT,
            &CreateWindowAux::new(),
        )?
        .check()?;

        tracing::debug!(root, wake_window, "x11: keyboard connected");

        Ok(Self { conn, root, wake_window, wake_atom: atoms._WINDOWCHARMER_WAKE })
    }

    /// Returns a handle that wakes [`next_event`](KeyboardBackend::next_event)
    /// with [`InputEvent::Interrupted`] from any thread.
    #[must_use]
    pub const fn interrupter(&self) -> Interrupter {
        Interrupter { window: self.wake_window, atom: self.wake_atom }
    }
}

impl Drop for X11Keyboard {
    fn drop(&mut self) {
        if let Ok(cookie) = self.conn.destroy_window(self.wake_window) {
            cookie.ignore_error();
        }
        let _ = self.conn.flush();
    }
}

impl KeyboardBackend for X11Keyboard {
    fn grab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()> {
        self.conn
            .grab_key(
                false,
                self.root,
                ModMask::from(modifiers),
                keycode,
                GrabMode::ASYNC,
                GrabMode::ASYNC,
            )?
            .check()
            .map_err(|err| HotkeyError::grab_failed(keycode, modifiers, err.to_string()))
    }

    fn ungrab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()> {
        self.conn.ungrab_key(keycode, self.root, ModMask::from(modifiers))?;
        Ok(())
    }

    fn next_event(&mut self) -> HotkeyResult<InputEvent> {
        let event = match self.conn.wait_for_event()? {
            Event::KeyPress(event) => InputEvent::KeyPress(event.detail),
            Event::KeyRelease(event) => InputEvent::KeyRelease(event.detail),
            Event::ClientMessage(event)
                if event.window == self.wake_window && event.type_ == self.wake_atom =>
            {
                InputEvent::Interrupted
            }
            Event::Error(err) => {
                tracing::warn!(error = ?err.error_kind, "x11: asynchronous keyboard error");
                InputEvent::Ignored
            }
            _ => InputEvent::Ignored,
        };

        Ok(event)
    }

    fn inject_key(&mut self, keycode: Keycode) -> HotkeyResult<()> {
        for kind in [KEY_PRESS_EVENT, KEY_RELEASE_EVENT] {
            self.conn.xtest_fake_input(kind, keycode, x11rb::CURRENT_TIME, self.root, 0, 0, 0)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> HotkeyResult<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn keycode_for(&self, keysym: u32) -> HotkeyResult<Option<Keycode>> {
        let setup = self.conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;

        let mapping = self.conn.get_keyboard_mapping(min_keycode, count)?.reply()?;
        let per_keycode = usize::from(mapping.keysyms_per_keycode).max(1);

        Ok(mapping
            .keysyms
            .chunks(per_keycode)
            .position(|syms| syms.contains(&keysym))
            .and_then(|offset| u8::try_from(offset).ok())
            .map(|offset| min_keycode + offset))
    }
}

// ============================================================================
// Interrupter
// ============================================================================

/// Wakes a blocked [`X11Keyboard`] event loop from another thread.
///
/// Sending opens a short-lived connection of its own, so the handle is plain
/// data and can be moved freely.
#[derive(Debug, Clone, Copy)]
pub struct Interrupter {
    window: Window,
    atom: Atom,
}

impl Interrupter {
    /// Sends the wake message.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be reached.
    pub fn interrupt(&self) -> HotkeyResult<()> {
        let (conn, _) = x11rb::connect(None)?;
        let event = ClientMessageEvent::new(32, self.window, self.atom, [0u32; 5]);

        conn.send_event(false, self.window, EventMask::NO_EVENT, event)?;
        conn.flush()?;
        Ok(())
    }
}
