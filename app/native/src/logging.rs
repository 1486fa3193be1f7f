//! Tracing subscriber setup.
//!
//! Logs go to stderr so that `list` output on stdout stays machine readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::constants::{LOG_ENV_VAR, LOG_TARGETS};

/// Returns the filter directives used when `WINDOWCHARMER_LOG` is unset.
#[must_use]
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    let targets: Vec<String> =
        LOG_TARGETS.iter().map(|target| format!("{target}={level}")).collect();

    format!("warn,{}", targets.join(","))
}

/// Installs the global subscriber.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
