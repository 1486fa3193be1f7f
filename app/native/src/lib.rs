//! windowcharmer - zone tiling for X11 window managers.
//!
//! The library is split into a window-system independent core and the X11
//! platform layer:
//!
//! - [`tiling`] computes zone geometry, classifies windows and runs actions
//!   through the [`tiling::WindowSystem`] and [`tiling::store::StateStore`]
//!   traits.
//! - [`hotkey`] captures modifier chords through the
//!   [`hotkey::KeyboardBackend`] trait.
//! - [`platform`] implements both traits over `x11rb` and handles signals.

pub mod cli;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod error;
pub mod hotkey;
pub mod logging;
pub mod platform;
pub mod tiling;
