//! Modifier-chord hotkey daemon.
//!
//! This module grabs one designated modifier key system-wide and turns
//! "modifier held + chord key" into tiling actions. The chord keys are only
//! grabbed while the modifier is held, so they behave normally otherwise, and
//! a bare tap of the modifier is passed through to the desktop.
//!
//! # Architecture
//!
//! - `engine`: the [`ChordCaptureEngine`] state machine and its grab guard
//! - `keysym`: keysym names and the default keybindings
//!
//! The engine talks to the keyboard through [`KeyboardBackend`]; the X11
//! implementation lives in `platform::x11`.

mod engine;
pub mod keysym;

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use engine::{CaptureState, ChordCaptureEngine};

use crate::tiling::Action;

/// Hardware keycode as reported by the X server.
pub type Keycode = u8;

/// Core protocol modifier mask (`KeyButMask`).
pub type ModifierMask = u16;

/// `Lock` (Caps Lock) modifier bit.
pub const LOCK_MASK: ModifierMask = 1 << 1;

/// `Mod2` (Num Lock on most layouts) modifier bit.
pub const MOD2_MASK: ModifierMask = 1 << 4;

/// Lock-key states a grab is registered for, so chords work regardless of
/// Caps Lock and Num Lock.
pub const LOCK_COMBINATIONS: [ModifierMask; 4] = [0, LOCK_MASK, MOD2_MASK, LOCK_MASK | MOD2_MASK];

// ============================================================================
// Errors
// ============================================================================

/// Result type alias for hotkey operations.
pub type HotkeyResult<T> = Result<T, HotkeyError>;

/// Errors that can occur while capturing chords.
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    /// The X server refused a passive key grab (usually another client
    /// already holds it).
    #[error("Failed to grab keycode {keycode} with modifiers 0x{modifiers:x}: {reason}")]
    GrabFailed {
        keycode: Keycode,
        modifiers: ModifierMask,
        reason: String,
    },

    /// A keybinding names a keysym this program does not know.
    #[error("Unknown key name '{0}'")]
    UnknownKey(String),

    /// A keysym is not produced by any key of the current keyboard mapping.
    #[error("Key '{0}' is not on the current keyboard map; refusing to bind keycode 0")]
    UnmappedKey(String),

    /// The keyboard connection failed.
    #[error("Keyboard connection failed: {0}")]
    Connection(String),

    /// A keyboard request was rejected by the X server.
    #[error("Keyboard request failed: {0}")]
    Protocol(String),
}

impl HotkeyError {
    /// Creates a grab failure for a keycode and modifier combination.
    #[must_use]
    pub fn grab_failed(keycode: Keycode, modifiers: ModifierMask, reason: impl Into<String>) -> Self {
        Self::GrabFailed { keycode, modifiers, reason: reason.into() }
    }
}

impl From<x11rb::errors::ConnectError> for HotkeyError {
    fn from(err: x11rb::errors::ConnectError) -> Self { Self::Connection(err.to_string()) }
}

impl From<x11rb::errors::ConnectionError> for HotkeyError {
    fn from(err: x11rb::errors::ConnectionError) -> Self { Self::Connection(err.to_string()) }
}

impl From<x11rb::errors::ReplyError> for HotkeyError {
    fn from(err: x11rb::errors::ReplyError) -> Self {
        match err {
            x11rb::errors::ReplyError::ConnectionError(err) => err.into(),
            x11rb::errors::ReplyError::X11Error(err) => Self::Protocol(format!("{:?}", err.error_kind)),
        }
    }
}

// ============================================================================
// Keyboard Backend
// ============================================================================

/// An input event delivered to the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A grabbed key was pressed.
    KeyPress(Keycode),
    /// A grabbed key was released.
    KeyRelease(Keycode),
    /// An external stop request woke the loop.
    Interrupted,
    /// Any other event.
    Ignored,
}

/// Keyboard access used by the capture engine.
pub trait KeyboardBackend {
    /// Registers a passive grab of `keycode` with exactly `modifiers` held.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyError::GrabFailed`] if the server refuses the grab.
    fn grab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()>;

    /// Releases a passive grab.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    fn ungrab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()>;

    /// Blocks until the next input event.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection breaks.
    fn next_event(&mut self) -> HotkeyResult<InputEvent>;

    /// Synthesizes a press and release of `keycode`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    fn inject_key(&mut self, keycode: Keycode) -> HotkeyResult<()>;

    /// Flushes buffered requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection breaks.
    fn flush(&mut self) -> HotkeyResult<()>;

    /// Returns the first keycode producing `keysym` in the current keyboard
    /// mapping, or `None` if no key produces it.
    ///
    /// # Errors
    ///
    /// Returns an error if the keyboard mapping cannot be read.
    fn keycode_for(&self, keysym: u32) -> HotkeyResult<Option<Keycode>>;
}

// ============================================================================
// Chord Modifier
// ============================================================================

/// Modifier held while a chord key is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChordModifier {
    Shift,
    Control,
    /// `Mod1`.
    Alt,
    /// `Mod3`.
    Hyper,
    /// `Mod4`.
    #[default]
    Super,
}

impl ChordModifier {
    /// Returns the core protocol mask bit for this modifier.
    #[must_use]
    pub const fn mask(self) -> ModifierMask {
        match self {
            Self::Shift => 1,
            Self::Control => 1 << 2,
            Self::Alt => 1 << 3,
            Self::Hyper => 1 << 5,
            Self::Super => 1 << 6,
        }
    }
}

// ============================================================================
// Bindings
// ============================================================================

/// Keybindings resolved to keycodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordBindings {
    /// Keycode of the designated modifier key.
    pub modifier: Keycode,
    /// Modifier mask the chord keys are grabbed with.
    pub chord_mask: ModifierMask,
    /// Chord keys and their actions.
    pub keys: BTreeMap<Keycode, Action>,
}

impl ChordBindings {
    /// Resolves keysym names against the backend's keyboard mapping.
    ///
    /// Several names can resolve to the same keycode (e.g. `KP_Prior` and
    /// `KP_Page_Up`); the first binding wins and later conflicting ones are
    /// reported.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is unknown or not on the keyboard, or if the
    /// keyboard mapping cannot be read.
    pub fn resolve(
        backend: &impl KeyboardBackend,
        modifier: &str,
        chord_modifier: ChordModifier,
        keybindings: &BTreeMap<String, Action>,
    ) -> HotkeyResult<Self> {
        let modifier = resolve_name(backend, modifier)?;
        let mut keys = BTreeMap::new();

        for (name, action) in keybindings {
            let keycode = resolve_name(backend, name)?;
            if keycode == modifier {
                tracing::warn!(key = %name, "hotkey: ignoring binding on the modifier key itself");
                continue;
            }

            match keys.get(&keycode) {
                Some(existing) if existing != action => {
                    tracing::warn!(
                        key = %name,
                        keycode,
                        %existing,
                        %action,
                        "hotkey: keycode already bound, ignoring"
                    );
                }
                Some(_) => {}
                None => {
                    keys.insert(keycode, *action);
                }
            }
        }

        Ok(Self { modifier, chord_mask: chord_modifier.mask(), keys })
    }
}

fn resolve_name(backend: &impl KeyboardBackend, name: &str) -> HotkeyResult<Keycode> {
    let keysym = keysym::from_name(name).ok_or_else(|| HotkeyError::UnknownKey(name.to_string()))?;

    match backend.keycode_for(keysym)? {
        Some(keycode) if keycode != 0 => Ok(keycode),
        _ => Err(HotkeyError::UnmappedKey(name.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
