use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::debug;

use super::commands;
use super::output;
use super::registry::CommandRegistry;
use super::{CliError, CommandResult, LoopControl};
use crate::calendar;
use crate::config::{Settings, SettingsManager};
use crate::subscription::Subscription;
use crate::time::{Clock, FixedClock, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Mutable state shared by every shell command.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub settings: Settings,
    pub clock: Box<dyn Clock>,
    pub subscriptions: Vec<Subscription>,
    pub source: Option<PathBuf>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let settings = SettingsManager::from_env()?.load()?;
        let clock: Box<dyn Clock> = match std::env::var(super::TODAY_ENV) {
            Ok(raw) => Box::new(FixedClock::on(calendar::parse_date(&raw)?)),
            Err(_) => Box::new(SystemClock),
        };
        Ok(Self::with_parts(mode, settings, clock))
    }

    pub fn with_parts(mode: CliMode, settings: Settings, clock: Box<dyn Clock>) -> Self {
        let mut registry = CommandRegistry::default();
        commands::register_all(&mut registry);
        Self {
            mode,
            registry,
            settings,
            clock,
            subscriptions: Vec::new(),
            source: None,
            running: true,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn prompt(&self) -> String {
        match &self.source {
            Some(path) => {
                let name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("subtrack[{name}]> ")
            }
            None => "subtrack> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn require_subscriptions(&self) -> Result<&[Subscription], CliError> {
        if self.source.is_none() {
            return Err(CliError::NothingLoaded);
        }
        Ok(&self.subscriptions)
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match self.registry.get(command).map(|entry| entry.handler) {
            Some(handler) => handler(self, args),
            None => {
                let hint = self
                    .registry
                    .suggest(command)
                    .map(|name| format!(" Did you mean `{name}`?"))
                    .unwrap_or_default();
                Err(CliError::Usage(format!(
                    "Unknown command `{command}`.{hint} Type `help` for the list."
                )))
            }
        }
    }

    pub fn report_error(&self, err: CliError) {
        debug!(error = %err, "command failed");
        output::error(err);
    }

    pub fn stop(&mut self) -> CommandResult {
        self.running = false;
        Ok(LoopControl::Exit)
    }
}
