//! Error types for the tiling engine.
//!
//! This module provides a unified error type for the geometry engine and its
//! window-system collaborator.
//!
//! # Error Categories
//!
//! - **Connection errors**: the windowing system cannot be reached at all
//! - **Lookup errors**: a window the caller relied on is gone
//! - **Protocol errors**: a request was rejected by the X server
//! - **State errors**: the persisted state store could not be read or written
//!
//! Missing window properties are not errors: the
//! [`WindowSystem`](super::backend::WindowSystem) reads return `Option` and
//! callers fall back to a default.
//!
//! A window whose rectangle matches no zone is not an error: classification
//! reports [`Zone::Unknown`](super::layout::Zone::Unknown) and re-tiling
//! simply leaves that window alone.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::tiling::error::{TilingError, TilingResult};
//!
//! fn active(ws: &impl WindowSystem) -> TilingResult<WindowHandle> {
//!     ws.active_window()?.ok_or(TilingError::NoActiveWindow)
//! }
//! ```

use std::fmt;

/// Result type alias for tiling operations.
pub type TilingResult<T> = Result<T, TilingError>;

/// Errors that can occur during tiling operations.
#[derive(Debug, Clone)]
pub enum TilingError {
    /// The windowing system could not be reached.
    ///
    /// This is fatal: without a display connection there is nothing to
    /// query or move. The daemon stops when a chord runs into it.
    CollaboratorUnavailable(String),

    /// No window currently has input focus.
    NoActiveWindow,

    /// A window with the given handle no longer exists.
    WindowNotFound(u32),

    /// The X server rejected a request.
    Protocol(String),

    /// The persisted state store could not be read or written.
    State(String),
}

impl TilingError {
    /// Creates a connection error with the given message.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::CollaboratorUnavailable(message.into())
    }

    /// Creates a protocol error with the given message.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self { Self::Protocol(message.into()) }

    /// Creates a state store error with the given message.
    #[must_use]
    pub fn state(message: impl Into<String>) -> Self { Self::State(message.into()) }

    /// Returns `true` if the windowing system cannot be used at all.
    #[must_use]
    pub const fn is_fatal(&self) -> bool { matches!(self, Self::CollaboratorUnavailable(_)) }

    /// Returns `true` if this error indicates a resource was not found.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::WindowNotFound(_) | Self::NoActiveWindow)
    }
}

impl fmt::Display for TilingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CollaboratorUnavailable(msg) => {
                write!(f, "Windowing system unavailable: {msg}")
            }
            Self::NoActiveWindow => {
                write!(f, "No active window")
            }
            Self::WindowNotFound(id) => {
                write!(f, "Window 0x{id:x} not found")
            }
            Self::Protocol(msg) => {
                write!(f, "X11 request failed: {msg}")
            }
            Self::State(msg) => {
                write!(f, "State store error: {msg}")
            }
        }
    }
}

impl std::error::Error for TilingError {}

// ============================================================================
// Conversions
// ============================================================================

impl From<x11rb::errors::ConnectError> for TilingError {
    fn from(err: x11rb::errors::ConnectError) -> Self { Self::unavailable(err.to_string()) }
}

impl From<x11rb::errors::ConnectionError> for TilingError {
    fn from(err: x11rb::errors::ConnectionError) -> Self { Self::unavailable(err.to_string()) }
}

impl From<x11rb::errors::ReplyError> for TilingError {
    fn from(err: x11rb::errors::ReplyError) -> Self {
        match err {
            x11rb::errors::ReplyError::ConnectionError(err) => err.into(),
            x11rb::errors::ReplyError::X11Error(err) => {
                match err.error_kind {
                    x11rb::protocol::ErrorKind::Window | x11rb::protocol::ErrorKind::Drawable => {
                        Self::WindowNotFound(err.bad_value)
                    }
                    kind => Self::protocol(format!("{kind:?}")),
                }
            }
        }
    }
}

impl From<super::store::StateError> for TilingError {
    fn from(err: super::store::StateError) -> Self { Self::state(err.to_string()) }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TilingError::unavailable("no DISPLAY").to_string(),
            "Windowing system unavailable: no DISPLAY"
        );

        assert_eq!(TilingError::NoActiveWindow.to_string(), "No active window");

        assert_eq!(
            TilingError::WindowNotFound(0x0400_0007).to_string(),
            "Window 0x4000007 not found"
        );

        assert_eq!(
            TilingError::protocol("Access").to_string(),
            "X11 request failed: Access"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(TilingError::unavailable("x").is_fatal());
        assert!(!TilingError::NoActiveWindow.is_fatal());
        assert!(!TilingError::protocol("x").is_fatal());

        assert!(TilingError::WindowNotFound(1).is_not_found());
        assert!(TilingError::NoActiveWindow.is_not_found());
        assert!(!TilingError::state("disk full").is_not_found());
    }
}
