//! Chord capture state machine.
//!
//! ```text
//!            modifier press                chord key press
//!   Idle  ------------------>  ModifierHeld  ---------------> dispatch, chord_used
//!    ^                             |
//!    +------- modifier release ----+   (tap passthrough if !chord_used)
//!
//!   any state -- Interrupted --> Stopped
//! ```
//!
//! Every grab registered by the engine is tracked by a guard that releases it
//! when the loop exits through a stop request or an error. Panics unwinding
//! out of the dispatch callback release them too, but release builds abort on
//! panic; the X server then drops the grabs with the connection.

use std::ops::ControlFlow;

use smallvec::SmallVec;

use super::{
    ChordBindings, HotkeyResult, InputEvent, Keycode, KeyboardBackend, LOCK_COMBINATIONS,
    ModifierMask,
};
use crate::tiling::Action;

/// State of the capture loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Waiting for the modifier.
    Idle,
    /// The modifier is held and the chord keys are grabbed.
    ModifierHeld {
        /// Whether a chord key was pressed during this hold.
        chord_used: bool,
    },
    /// The loop has exited.
    Stopped,
}

/// Captures modifier chords and dispatches their actions.
pub struct ChordCaptureEngine<K: KeyboardBackend> {
    backend: K,
    bindings: ChordBindings,
    state: CaptureState,
}

impl<K: KeyboardBackend> ChordCaptureEngine<K> {
    /// Creates an engine over a keyboard backend.
    #[must_use]
    pub const fn new(backend: K, bindings: ChordBindings) -> Self {
        Self { backend, bindings, state: CaptureState::Idle }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> CaptureState { self.state }

    /// Returns the keyboard backend.
    #[must_use]
    pub const fn backend(&self) -> &K { &self.backend }

    /// Runs the capture loop until interrupted or until `dispatch` breaks.
    ///
    /// # Arguments
    ///
    /// * `dispatch` - Called with the bound action for every chord key press;
    ///   returning [`ControlFlow::Break`] stops the loop
    ///
    /// # Errors
    ///
    /// Returns an error if the modifier cannot be grabbed (the loop is not
    /// entered) or the keyboard connection fails. All grabs are released
    /// before returning.
    pub fn run<F: FnMut(Action) -> ControlFlow<()>>(&mut self, mut dispatch: F) -> HotkeyResult<()> {
        let Self { backend, bindings, state } = self;
        *state = CaptureState::Idle;

        let mut grabs = GrabGuard::new(backend);
        let result = capture(&mut grabs, bindings, state, &mut dispatch);
        *state = CaptureState::Stopped;
        drop(grabs);

        match &result {
            Ok(()) => tracing::info!("hotkey: capture stopped"),
            Err(err) => tracing::error!(error = %err, "hotkey: capture failed"),
        }

        result
    }
}

fn capture<K: KeyboardBackend>(
    grabs: &mut GrabGuard<'_, K>,
    bindings: &ChordBindings,
    state: &mut CaptureState,
    dispatch: &mut impl FnMut(Action) -> ControlFlow<()>,
) -> HotkeyResult<()> {
    grabs.grab_modifier(bindings.modifier)?;
    grabs.flush()?;

    tracing::info!(
        modifier = bindings.modifier,
        chords = bindings.keys.len(),
        "hotkey: capturing chords"
    );

    loop {
        let event = grabs.backend.next_event()?;

        *state = match (*state, event) {
            (_, InputEvent::Interrupted) => return Ok(()),

            (CaptureState::Idle, InputEvent::KeyPress(keycode)) if keycode == bindings.modifier => {
                for &keycode in bindings.keys.keys() {
                    grabs.grab_chord(keycode, bindings.chord_mask);
                }
                grabs.flush()?;
                CaptureState::ModifierHeld { chord_used: false }
            }

            (CaptureState::ModifierHeld { chord_used }, InputEvent::KeyRelease(keycode))
                if keycode == bindings.modifier =>
            {
                grabs.release_chords();
                if !chord_used {
                    tracing::debug!("hotkey: passing modifier tap through");
                    grabs.release_modifier();
                    grabs.backend.inject_key(bindings.modifier)?;
                    grabs.grab_modifier(bindings.modifier)?;
                }
                grabs.flush()?;
                CaptureState::Idle
            }

            // Auto-repeat of the held modifier
            (held @ CaptureState::ModifierHeld { .. }, InputEvent::KeyPress(keycode))
                if keycode == bindings.modifier =>
            {
                held
            }

            (CaptureState::ModifierHeld { .. }, InputEvent::KeyPress(keycode)) => {
                if let Some(&action) = bindings.keys.get(&keycode) {
                    tracing::debug!(keycode, %action, "hotkey: chord");
                    if dispatch(action).is_break() {
                        tracing::debug!(%action, "hotkey: dispatch requested stop");
                        return Ok(());
                    }
                } else {
                    tracing::debug!(keycode, "hotkey: unbound key during chord");
                }
                CaptureState::ModifierHeld { chord_used: true }
            }

            (current, _) => current,
        };
    }
}

// ============================================================================
// Grab Guard
// ============================================================================

/// Tracks registered grabs and releases them on drop.
struct GrabGuard<'k, K: KeyboardBackend> {
    backend: &'k mut K,
    modifier: SmallVec<[(Keycode, ModifierMask); 4]>,
    chords: Vec<(Keycode, ModifierMask)>,
}

impl<'k, K: KeyboardBackend> GrabGuard<'k, K> {
    fn new(backend: &'k mut K) -> Self {
        Self { backend, modifier: SmallVec::new(), chords: Vec::new() }
    }

    /// Grabs the modifier for every lock combination. Fails on the first refusal.
    fn grab_modifier(&mut self, keycode: Keycode) -> HotkeyResult<()> {
        for lock in LOCK_COMBINATIONS {
            self.backend.grab_key(keycode, lock)?;
            self.modifier.push((keycode, lock));
        }
        Ok(())
    }

    /// Grabs a chord key for every lock combination. A refusal is logged and
    /// leaves the key unusable until the modifier is released.
    fn grab_chord(&mut self, keycode: Keycode, mask: ModifierMask) {
        for lock in LOCK_COMBINATIONS {
            match self.backend.grab_key(keycode, mask | lock) {
                Ok(()) => self.chords.push((keycode, mask | lock)),
                Err(err) => {
                    tracing::warn!(keycode, error = %err, "hotkey: chord key unavailable");
                    return;
                }
            }
        }
    }

    fn release_chords(&mut self) {
        for (keycode, modifiers) in self.chords.drain(..) {
            if let Err(err) = self.backend.ungrab_key(keycode, modifiers) {
                tracing::warn!(keycode, error = %err, "hotkey: failed to release chord grab");
            }
        }
    }

    fn release_modifier(&mut self) {
        for (keycode, modifiers) in self.modifier.drain(..) {
            if let Err(err) = self.backend.ungrab_key(keycode, modifiers) {
                tracing::warn!(keycode, error = %err, "hotkey: failed to release modifier grab");
            }
        }
    }

    fn flush(&mut self) -> HotkeyResult<()> { self.backend.flush() }
}

impl<K: KeyboardBackend> Drop for GrabGuard<'_, K> {
    fn drop(&mut self) {
        self.release_chords();
        self.release_modifier();
        if let Err(err) = self.backend.flush() {
            tracing::warn!(error = %err, "hotkey: failed to flush released grabs");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet, VecDeque};

    use super::*;
    use crate::hotkey::HotkeyError;

    const SUPER: Keycode = 133;
    const LEFT: Keycode = 113;
    const KP_ADD: Keycode = 86;
    const Q: Keycode = 24;
    const MOD4: ModifierMask = 64;

    #[derive(Default)]
    struct FakeKeyboard {
        events: VecDeque<InputEvent>,
        grabbed: BTreeSet<(Keycode, ModifierMask)>,
        refuse: BTreeSet<Keycode>,
        injected: Vec<Keycode>,
        max_grabbed: usize,
    }

    impl FakeKeyboard {
        fn with_events(events: impl IntoIterator<Item = InputEvent>) -> Self {
            Self { events: events.into_iter().collect(), ..Self::default() }
        }
    }

    impl KeyboardBackend for FakeKeyboard {
        fn grab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()> {
            if self.refuse.contains(&keycode) {
                return Err(HotkeyError::grab_failed(keycode, modifiers, "Access"));
            }
            self.grabbed.insert((keycode, modifiers));
            self.max_grabbed = self.max_grabbed.max(self.grabbed.len());
            Ok(())
        }

        fn ungrab_key(&mut self, keycode: Keycode, modifiers: ModifierMask) -> HotkeyResult<()> {
            self.grabbed.remove(&(keycode, modifiers));
            Ok(())
        }

        fn next_event(&mut self) -> HotkeyResult<InputEvent> {
            self.events
                .pop_front()
                .ok_or_else(|| HotkeyError::Connection("event queue drained".to_string()))
        }

        fn inject_key(&mut self, keycode: Keycode) -> HotkeyResult<()> {
            assert!(
                !self.grabbed.iter().any(|(k, _)| *k == keycode),
                "injected key must not be grabbed"
            );
            self.injected.push(keycode);
            Ok(())
        }

        fn flush(&mut self) -> HotkeyResult<()> { Ok(()) }

        fn keycode_for(&self, _keysym: u32) -> HotkeyResult<Option<Keycode>> { Ok(None) }
    }

    fn bindings() -> ChordBindings {
        ChordBindings {
            modifier: SUPER,
            chord_mask: MOD4,
            keys: BTreeMap::from([(LEFT, Action::Left), (KP_ADD, Action::Bigger)]),
        }
    }

    fn run(keyboard: FakeKeyboard) -> (ChordCaptureEngine<FakeKeyboard>, Vec<Action>, HotkeyResult<()>) {
        let mut engine = ChordCaptureEngine::new(keyboard, bindings());
        let mut actions = Vec::new();
        let result = engine.run(|action| {
            actions.push(action);
            ControlFlow::Continue(())
        });
        (engine, actions, result)
    }

    #[test]
    fn test_bare_tap_is_passed_through_once() {
        let (engine, actions, result) = run(FakeKeyboard::with_events([
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyRelease(SUPER),
            InputEvent::Interrupted,
        ]));

        assert!(result.is_ok());
        assert!(actions.is_empty());
        assert_eq!(engine.backend().injected, vec![SUPER]);
        assert_eq!(engine.state(), CaptureState::Stopped);
    }

    #[test]
    fn test_chord_suppresses_tap() {
        let (engine, actions, result) = run(FakeKeyboard::with_events([
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyPress(LEFT),
            InputEvent::KeyRelease(LEFT),
            InputEvent::KeyPress(KP_ADD),
            InputEvent::KeyRelease(SUPER),
            InputEvent::Interrupted,
        ]));

        assert!(result.is_ok());
        assert_eq!(actions, vec![Action::Left, Action::Bigger]);
        assert!(engine.backend().injected.is_empty());
    }

    #[test]
    fn test_unbound_key_counts_as_chord() {
        let (engine, actions, _) = run(FakeKeyboard::with_events([
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyPress(Q),
            InputEvent::KeyRelease(SUPER),
            InputEvent::Interrupted,
        ]));

        assert!(actions.is_empty());
        assert!(engine.backend().injected.is_empty());
    }

    #[test]
    fn test_chord_keys_only_grabbed_while_held() {
        let (engine, actions, _) = run(FakeKeyboard::with_events([
            InputEvent::KeyPress(LEFT),
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyPress(LEFT),
            InputEvent::KeyRelease(SUPER),
            InputEvent::KeyPress(LEFT),
            InputEvent::Interrupted,
        ]));

        // Only the press while held dispatches
        assert_eq!(actions, vec![Action::Left]);
        // modifier + two chord keys, four lock combinations each
        assert_eq!(engine.backend().max_grabbed, 12);
    }

    #[test]
    fn test_chord_grab_failure_is_not_fatal() {
        let mut keyboard = FakeKeyboard::with_events([
            InputEvent::KeyPress(SUPER),
            InputEvent::KeyPress(KP_ADD),
            InputEvent::KeyRelease(SUPER),
            InputEvent::Interrupted,
        ]);
        keyboard.refuse.insert(LEFT);

        let (engine, actions, result) = run(keyboard);
        assert!(result.is_ok());
        assert_eq!(actions, vec![Action::Bigger]);
        assert!(engine.backend().grabbed.is_empty());
    }

    #[test]
    fn test_modifier_grab_failure_is_fatal() {
        let mut keyboard = FakeKeyboard::with_events([InputEvent::KeyPress(SUPER)]);
        keyboard.refuse.insert(SUPER);

        let (engine, actions, result) = run(keyboard);
        assert!(matches!(result, Err(HotkeyError::GrabFailed { keycode: SUPER, .. })));
        assert!(actions.is_empty());
        // The loop was never entered
        assert_eq!(engine.backend().events.len(), 1);
        assert_eq!(engine.state(), CaptureState::Stopped);
    }

    #[test]
    fn test_interrupt_while_held_releases_everything() {
        let (engine, _, result) = run(FakeKeyboard::with_events([
            InputEvent::KeyPress(SUPER),
            InputEvent::Interrupted,
        ]));

        assert!(result.is_ok());
        assert!(engine.backend().grabbed.is_empty());
        assert!(engine.backend().injected.is_empty());
    }

    #[test]
    fn test_connection_error_releases_everything() {
        let (engine, _, result) = run(FakeKeyboard::with_events([InputEvent::KeyPress(SUPER)]));

        assert!(matches!(result, Err(HotkeyError::Connection(_))));
        assert!(engine.backend().grabbed.is_empty());
    }

    #[test]
    fn test_panic_in_dispatch_releases_everything() {
        let mut engine = ChordCaptureEngine::new(
            FakeKeyboard::with_events([InputEvent::KeyPress(SUPER), InputEvent::KeyPress(LEFT)]),
            bindings(),
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            engine.run(|_| -> ControlFlow<()> { panic!("dispatch failed") })
        }));

        assert!(outcome.is_err());
        assert!(engine.backend().grabbed.is_empty());
    }

    #[test]
    fn test_ignored_events_do_not_change_state() {
        let (engine, actions, _) = run(FakeKeyboard::with_events([
            InputEvent::Ignored,
            InputEvent::KeyRelease(LEFT),
            InputEvent::KeyPress(SUPER),
            InputEvent::Ignored,
            InputEvent::KeyPress(LEFT),
            InputEvent::KeyRelease(SUPER),
            InputEvent::Interrupted,
        ]));

        assert_eq!(actions, vec![Action::Left]);
        assert!(engine.backend().injected.is_empty());
    }

    #[test]
    fn test_dispatch_break_stops_and_releases_everything() {
        let mut engine = ChordCaptureEngine::new(
            FakeKeyboard::with_events([
                InputEvent::KeyPress(SUPER),
                InputEvent::KeyPress(LEFT),
                InputEvent::KeyPress(KP_ADD),
                InputEvent::KeyRelease(SUPER),
            ]),
            bindings(),
        );

        let mut actions = Vec::new();
        let result = engine.run(|action| {
            actions.push(action);
            ControlFlow::Break(())
        });

        assert!(result.is_ok());
        assert_eq!(actions, vec![Action::Left]);
        assert!(engine.backend().grabbed.is_empty());
        assert!(engine.backend().injected.is_empty());
        assert_eq!(engine.backend().events.len(), 2);
        assert_eq!(engine.state(), CaptureState::Stopped);
    }
}
