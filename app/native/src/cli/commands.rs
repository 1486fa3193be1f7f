//! CLI argument definitions using Clap.
//!
//! One invocation either performs a single tiling action on the focused
//! window and exits, or (`--daemonize`) starts the chord daemon.

use std::io;
use std::path::PathBuf;

use clap::{ArgGroup, CommandFactory, Parser};
use clap_complete::{Generator, Shell, generate};
use colored::Colorize;

use super::output;
use crate::config::{self, LoadedConfig};
use crate::constants::{APP_NAME, APP_VERSION};
use crate::daemon;
use crate::error::CharmerError;
use crate::platform::X11Session;
use crate::tiling::store::JsonStateStore;
use crate::tiling::{Action, ActionOutcome, TilingSession};

/// windowcharmer - zone tiling for X11 window managers.
#[derive(Parser, Debug)]
#[command(name = "windowcharmer")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["action", "daemonize", "schema", "completions", "print_config"])
))]
#[command(after_long_help = r#"Examples:
  windowcharmer left              # Move the focused window to the left column
  windowcharmer bigger            # Widen the center column and re-tile the desktop
  windowcharmer list --json       # Describe every window on the current desktop
  windowcharmer --daemonize       # Capture Super+key chords until interrupted"#)]
pub struct Cli {
    /// Action to perform on the focused window (or the whole desktop).
    #[arg(value_enum, value_name = "ACTION")]
    pub action: Option<Action>,

    /// Run the chord daemon instead of a single action.
    #[arg(long, short)]
    pub daemonize: bool,

    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    pub verbose: bool,

    /// Output the configuration JSON Schema.
    ///
    /// Can be redirected to a file for use with editors that support
    /// JSON Schema validation.
    #[arg(long)]
    pub schema: bool,

    /// Print the commented configuration template.
    #[arg(long)]
    pub print_config: bool,

    /// Generate shell completions for the given shell.
    ///
    /// Usage:
    ///   eval "$(windowcharmer --completions zsh)"
    ///   windowcharmer --completions fish > ~/.config/fish/completions/windowcharmer.fish
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the action fails.
    pub fn execute(&self) -> Result<(), CharmerError> {
        if self.schema {
            println!("{}", config::schema::generate_schema_json());
            return Ok(());
        }

        if self.print_config {
            print!("{}", config::template::generate_config_template());
            return Ok(());
        }

        if let Some(shell) = self.completions {
            Self::print_completions(shell);
            return Ok(());
        }

        let loaded = self.load_config()?;

        if self.daemonize {
            return daemon::run(&loaded);
        }

        match self.action {
            Some(action) => self.perform(&loaded, action),
            None => Err(CharmerError::InvalidArguments("No action given".to_string())),
        }
    }

    fn load_config(&self) -> Result<LoadedConfig, CharmerError> {
        match &self.config {
            Some(path) => {
                if !path.exists() {
                    return Err(CharmerError::InvalidArguments(format!(
                        "Configuration file not found: {}",
                        path.display()
                    )));
                }
                Ok(config::load_from(path)?)
            }
            None => Ok(config::load_or_default()),
        }
    }

    fn perform(&self, loaded: &LoadedConfig, action: Action) -> Result<(), CharmerError> {
        let mut ws = X11Session::connect()?;
        let mut store = JsonStateStore::open(loaded.state_file())?;

        let outcome = TilingSession::begin(&mut ws, &mut store, loaded.config.session_options())?
            .perform(action)?;

        self.print_outcome(action, &outcome)
    }

    fn print_outcome(&self, action: Action, outcome: &ActionOutcome) -> Result<(), CharmerError> {
        match outcome {
            ActionOutcome::Listed(reports) => {
                if self.json {
                    output::print_json(reports)?;
                } else {
                    output::print_window_table(reports);
                }
            }
            ActionOutcome::Placed { window, zone } => {
                tracing::debug!(%action, window, %zone, "cli: placed window");
                if self.json {
                    output::print_json(&serde_json::json!({
                        "action": action,
                        "window": window,
                        "zone": zone,
                        "placed": true,
                    }))?;
                }
            }
            ActionOutcome::Skipped { window, zone } => {
                if self.json {
                    output::print_json(&serde_json::json!({
                        "action": action,
                        "window": window,
                        "zone": zone,
                        "placed": false,
                    }))?;
                } else {
                    eprintln!(
                        "{} {zone} is not part of the current layout",
                        "Skipped:".yellow()
                    );
                }
            }
            ActionOutcome::Retiled(summary) => {
                if self.json {
                    output::print_json(summary)?;
                } else {
                    tracing::info!(
                        ratio_index = summary.ratio_index,
                        placed = summary.placed,
                        windows = summary.windows,
                        "cli: re-tiled desktop"
                    );
                }
            }
        }

        Ok(())
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, APP_NAME, &mut io::stdout());
    }
}
