//! Application-wide constants.

/// Application name, used for directories and the binary.
pub const APP_NAME: &str = "windowcharmer";

/// Application version from Cargo.toml.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the log filter directives.
pub const LOG_ENV_VAR: &str = "WINDOWCHARMER_LOG";

/// Tracing targets emitted by this crate.
pub const LOG_TARGETS: &[&str] = &["windowcharmer", "windowcharmer_lib"];
