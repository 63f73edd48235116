//! Line-oriented shell over the billing calculations.

pub mod commands;
pub mod context;
pub mod output;
pub mod registry;
pub mod shell;

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::{BillingError, StoreError};

pub use context::{CliMode, ShellContext};
pub use shell::run_cli;

/// Script mode switch: commands are read from stdin without line editing.
pub const SCRIPT_ENV: &str = "SUBTRACK_CLI_SCRIPT";
/// Pins the shell's notion of today (`YYYY-MM-DD`).
pub const TODAY_ENV: &str = "SUBTRACK_TODAY";

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Billing(#[from] BillingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("{0}")]
    Usage(String),
    #[error("Nothing loaded: run `load <file>` first")]
    NothingLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CliError>;
