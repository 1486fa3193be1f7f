//! X11 backends built on `x11rb`.
//!
//! - [`X11Session`] - the tiling [`WindowSystem`](crate::tiling::WindowSystem)
//! - [`X11Keyboard`] - the chord daemon's [`KeyboardBackend`](crate::hotkey::KeyboardBackend)
//!
//! Each backend owns its own connection so a server grab taken while tiling
//! never blocks the keyboard loop.

mod atoms;
mod keyboard;
mod session;

pub use keyboard::{Interrupter, X11Keyboard};
pub use session::X11Session;
