//! Termination signal handling.
//!
//! The chord daemon blocks on the X connection, so a signal cannot simply
//! unwind it. Instead a watcher thread receives `SIGINT`/`SIGTERM` and runs a
//! stop callback that wakes the loop, letting it release its grabs and
//! return normally. A second signal exits immediately.

use std::io;
use std::thread::JoinHandle;

use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};

/// Watches for termination signals until dropped.
#[derive(Debug)]
pub struct SignalGuard {
    handle: Handle,
    thread: Option<JoinHandle<()>>,
}

impl SignalGuard {
    /// Installs the signal watcher.
    ///
    /// # Arguments
    ///
    /// * `on_stop` - Called on the watcher thread for the first signal
    ///
    /// # Errors
    ///
    /// Returns an error if the handlers cannot be registered or the thread
    /// cannot be spawned.
    pub fn install<F>(on_stop: F) -> io::Result<Self>
    where F: Fn() + Send + 'static {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();

        let thread = std::thread::Builder::new().name("windowcharmer-signals".to_string()).spawn(
            move || {
                let mut received = 0;
                for signal in signals.forever() {
                    received += 1;
                    if received == 1 {
                        tracing::info!(signal, "signal: stop requested");
                        on_stop();
                    } else {
                        tracing::warn!(signal, "signal: second stop request, exiting");
                        std::process::exit(128 + signal);
                    }
                }
            },
        )?;

        Ok(Self { handle, thread: Some(thread) })
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_first_signal_runs_stop_callback() {
        let (tx, rx) = mpsc::channel();
        let guard = SignalGuard::install(move || {
            let _ = tx.send(());
        })
        .unwrap();

        signal_hook::low_level::raise(SIGTERM).unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());

        drop(guard);
    }
}
