//! Error types for windowcharmer.
//!
//! Each layer has its own error type; [`CharmerError`] is what the CLI and
//! the daemon return, with conversions from every layer.

use thiserror::Error;

use crate::config::ConfigError;
use crate::hotkey::HotkeyError;
use crate::tiling::TilingError;
use crate::tiling::store::StateError;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum CharmerError {
    /// Invalid command arguments.
    #[error("{0}")]
    InvalidArguments(String),
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// State store error.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// Tiling operation failed.
    #[error("Tiling error: {0}")]
    Tiling(#[from] TilingError),
    /// Chord capture failed.
    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Output serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CharmerError {
    /// Renders the error followed by every underlying cause.
    ///
    /// Causes whose message is already part of the rendered text are skipped.
    #[must_use]
    pub fn report(&self) -> String {
        let mut report = self.to_string();
        let mut source = std::error::Error::source(self);

        while let Some(cause) = source {
            let message = cause.to_string();
            if !report.contains(&message) {
                report.push_str("\n  caused by: ");
                report.push_str(&message);
            }
            source = std::error::Error::source(cause);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::fmt;

    use super::*;

    #[test]
    fn test_invalid_arguments_display() {
        let err = CharmerError::InvalidArguments("unknown action 'sideways'".to_string());
        assert_eq!(err.to_string(), "unknown action 'sideways'");
    }

    #[test]
    fn test_config_error_display() {
        let err: CharmerError = ConfigError::NotFound.into();
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("No configuration file found"));
    }

    #[test]
    fn test_tiling_error_display() {
        let err: CharmerError = TilingError::WindowNotFound(0x3a0_0007).into();
        assert!(err.to_string().starts_with("Tiling error"));
    }

    #[test]
    fn test_hotkey_error_display() {
        let err: CharmerError = HotkeyError::UnknownKey("KP_Nowhere".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("Hotkey error"));
        assert!(msg.contains("KP_Nowhere"));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err: CharmerError = io_err.into();
        assert!(matches!(err, CharmerError::Io(_)));
        assert!(err.to_string().contains("permission denied"));
    }

    #[derive(Debug)]
    struct Locked {
        holder: std::io::Error,
    }

    impl fmt::Display for Locked {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "state file is locked") }
    }

    impl std::error::Error for Locked {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> { Some(&self.holder) }
    }

    #[test]
    fn test_report_lists_hidden_causes() {
        let err = CharmerError::Io(std::io::Error::other(Locked {
            holder: std::io::Error::other("held by pid 4242"),
        }));

        assert_eq!(err.report(), "IO error: state file is locked\n  caused by: held by pid 4242");
    }

    #[test]
    fn test_report_skips_causes_already_in_message() {
        let parse = serde_json::from_str::<u32>("tolerance").unwrap_err();
        let err = CharmerError::Config(ConfigError::ParseError(parse));

        assert!(err.source().is_some());
        assert_eq!(err.report(), err.to_string());
    }
}
