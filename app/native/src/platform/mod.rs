//! Linux platform integration for windowcharmer.
//!
//! - [`x11`] - X11 window-system and keyboard backends
//! - [`signal`] - termination signal handling for the daemon
//! - [`path`] - shell-like path expansion

pub mod path;
pub mod signal;
pub mod x11;

pub use signal::SignalGuard;
pub use x11::{Interrupter, X11Keyboard, X11Session};
