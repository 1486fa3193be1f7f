//! The chord daemon.
//!
//! Holds one tiling connection and one keyboard connection for its whole
//! lifetime. Every chord builds a fresh [`TilingSession`] over the tiling
//! connection, so geometry, calibration and ratio selections are always read
//! anew. `SIGINT`/`SIGTERM` wake the capture loop, which releases its grabs
//! before the daemon returns. Losing the tiling connection stops the loop the
//! same way and is reported as the daemon's error.

use std::ops::ControlFlow;

use crate::config::LoadedConfig;
use crate::error::CharmerError;
use crate::hotkey::{ChordBindings, ChordCaptureEngine};
use crate::platform::{SignalGuard, X11Keyboard, X11Session};
use crate::tiling::store::{JsonStateStore, StateStore};
use crate::tiling::{
    Action, ActionOutcome, SessionOptions, TilingError, TilingResult, TilingSession, WindowSystem,
};

/// Runs the chord daemon until a termination signal arrives.
///
/// # Errors
///
/// Returns an error if either display connection fails (at startup or while
/// running), the state file cannot be read, a keybinding cannot be resolved,
/// or the modifier key cannot be grabbed.
pub fn run(loaded: &LoadedConfig) -> Result<(), CharmerError> {
    let config = &loaded.config;
    let options = config.session_options();

    let mut ws = X11Session::connect()?;
    let mut store = JsonStateStore::open(loaded.state_file())?;

    let keyboard = X11Keyboard::connect()?;
    let bindings = ChordBindings::resolve(
        &keyboard,
        &config.modifier,
        config.modifier_mask,
        &config.keybindings,
    )?;

    let interrupter = keyboard.interrupter();
    let _signals = SignalGuard::install(move || {
        if let Err(err) = interrupter.interrupt() {
            tracing::error!(error = %err, "daemon: failed to wake capture loop");
        }
    })?;

    tracing::info!(
        modifier = %config.modifier,
        chords = bindings.keys.len(),
        state = %store.path().display(),
        "daemon: started"
    );

    let mut fatal = None;
    let mut engine = ChordCaptureEngine::new(keyboard, bindings);
    engine.run(|action| {
        let result = handle_chord(&mut ws, &mut store, options, action);
        after_chord(action, result).map_break(|err| fatal = Some(err))
    })?;

    if let Some(err) = fatal {
        return Err(err.into());
    }

    tracing::info!("daemon: stopped");
    Ok(())
}

/// Decides whether the daemon keeps capturing after a chord.
///
/// Failed actions are logged and capture continues, unless the windowing
/// system itself is gone.
fn after_chord(action: Action, result: TilingResult<ActionOutcome>) -> ControlFlow<TilingError> {
    match result {
        Ok(_) => ControlFlow::Continue(()),
        Err(err) if err.is_fatal() => {
            tracing::error!(%action, error = %err, "daemon: windowing system lost, stopping");
            ControlFlow::Break(err)
        }
        Err(err) => {
            tracing::error!(%action, error = %err, "daemon: action failed");
            ControlFlow::Continue(())
        }
    }
}

/// Runs one action in a fresh session.
///
/// The store is refreshed first so that selections made by one-shot CLI
/// invocations are honored. A store that cannot be refreshed keeps its
/// previous snapshot.
///
/// # Errors
///
/// Returns an error if the session cannot be built or the action fails.
pub fn handle_chord<W: WindowSystem, S: StateStore>(
    ws: &mut W,
    store: &mut S,
    options: SessionOptions,
    action: Action,
) -> TilingResult<ActionOutcome> {
    if let Err(err) = store.refresh() {
        tracing::warn!(error = %err, "daemon: keeping previous state snapshot");
    }

    let outcome = TilingSession::begin(ws, store, options)?.perform(action)?;
    log_outcome(action, &outcome);
    Ok(outcome)
}

fn log_outcome(action: Action, outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Placed { window, zone } => {
            tracing::info!(%action, window, %zone, "daemon: placed window");
        }
        ActionOutcome::Skipped { window, zone } => {
            tracing::info!(%action, window, %zone, "daemon: zone not in layout, skipped");
        }
        ActionOutcome::Retiled(summary) => {
            tracing::info!(
                %action,
                ratio_index = summary.ratio_index,
                placed = summary.placed,
                "daemon: re-tiled desktop"
            );
        }
        ActionOutcome::Listed(reports) => {
            for report in reports {
                tracing::info!(
                    window = report.window,
                    title = %report.title,
                    zone = %report.zone,
                    x = report.rect.x,
                    y = report.rect.y,
                    width = report.rect.width,
                    height = report.rect.height,
                    "daemon: window"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiling::RetileSummary;

    #[test]
    fn test_after_chord_continues_on_success() {
        let outcome = ActionOutcome::Retiled(RetileSummary { ratio_index: 3, windows: 2, placed: 2 });
        assert!(after_chord(Action::Bigger, Ok(outcome)).is_continue());
    }

    #[test]
    fn test_after_chord_continues_on_recoverable_error() {
        assert!(after_chord(Action::Left, Err(TilingError::NoActiveWindow)).is_continue());
        assert!(
            after_chord(Action::Left, Err(TilingError::WindowNotFound(0x3a0_0007))).is_continue()
        );
    }

    #[test]
    fn test_after_chord_stops_when_connection_is_lost() {
        let flow = after_chord(Action::Max, Err(TilingError::unavailable("broken pipe")));
        assert!(matches!(flow, ControlFlow::Break(TilingError::CollaboratorUnavailable(_))));
    }
}
