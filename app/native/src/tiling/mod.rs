//! Zone tiling for X11 desktops.
//!
//! This module computes zone rectangles for the screen, classifies windows
//! back into zones, and re-tiles a desktop when its center-column ratio
//! changes.
//!
//! # Architecture
//!
//! - `layout`: pure geometry (ratio table, zone rectangles, classification)
//! - `state`: geometric input types
//! - `store`: persisted decoration profile and per-desktop ratio selection
//! - `backend`: the [`WindowSystem`] collaborator trait
//! - `manager`: the per-action [`TilingSession`]
//! - `action`: the actions exposed by the CLI and keybindings

pub mod action;
pub mod backend;
pub mod constants;
pub mod error;
pub mod layout;
pub mod manager;
pub mod state;
pub mod store;

pub use action::Action;
pub use backend::WindowSystem;
pub use error::{TilingError, TilingResult};
pub use manager::{ActionOutcome, RetileSummary, SessionOptions, TilingSession, WindowReport};
