//! Command dispatch, error types, and shell context setup.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{self, Config, ConfigError, ConfigManager},
    core::{LedgerEngine, SystemClock},
    errors::{LedgerError, StoreError},
    storage::{json_backend::JsonStore, LoadOutcome},
};

use super::commands;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

const CATEGORY_SUFFIX: &str = "_materials";

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let app_dir = config::app_data_dir();
        let config_manager = ConfigManager::with_base_dir(&app_dir)?;
        let config = config_manager.load()?;
        Ok(Self::with_config(mode, app_dir, config_manager, config))
    }

    pub(crate) fn with_config(
        mode: CliMode,
        app_dir: PathBuf,
        config_manager: ConfigManager,
        config: Config,
    ) -> Self {
        output::set_color_enabled(config.ui_color_enabled);

        let store = JsonStore::new(
            config.resolve_data_file(&app_dir),
            config.resolve_backups_dir(&app_dir),
            Some(config.backup_retention),
        );
        let engine = LedgerEngine::open(Box::new(store), Arc::new(SystemClock), &config.site_name);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = ShellContext {
            mode,
            registry,
            engine,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            app_dir,
            last_command: None,
            running: true,
        };
        context.report_load();
        context
    }

    fn report_load(&self) {
        match self.engine.load_outcome() {
            LoadOutcome::Loaded | LoadOutcome::Seeded => {}
            LoadOutcome::Migrated => cli_io::print_info(
                "Imported inventory from the previous file format. It will be rewritten on the next change.",
            ),
            LoadOutcome::Recovered { reason } => {
                cli_io::print_warning(format!(
                    "Inventory file could not be read ({reason}). Starting from the default catalogue."
                ));
            }
        }
        for warning in self.engine.load_warnings() {
            cli_io::print_warning(warning);
        }
    }

    pub(crate) fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    pub(crate) fn prompt(&self) -> String {
        format!("{} > ", self.engine.site_name())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Maps a short alias such as `paint` onto `paint_materials` when the
    /// exact name is not a known category.
    pub(crate) fn resolve_category(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if self.engine.category(trimmed).is_some() {
            return trimmed.to_string();
        }
        let alias = format!("{}{}", trimmed.to_lowercase(), CATEGORY_SUFFIX);
        if self.engine.category(&alias).is_some() {
            return alias;
        }
        trimmed.to_string()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Ledger(LedgerError::CategoryNotFound(name)) => {
                self.print_error(&format!("Category not found: {}", name));
                let known: Vec<&str> = self
                    .engine
                    .categories()
                    .iter()
                    .map(|category| category.name.as_str())
                    .collect();
                self.print_hint(&format!("Known categories: {}", known.join(", ")));
                Ok(())
            }
            CommandError::Ledger(err @ LedgerError::Persistence(_)) => {
                self.print_error(&format!("{err}. The change was not applied."));
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Fatal shell failures. Per-command problems are [`CommandError`]s and never end the loop.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Command(#[from] CommandError),
}
