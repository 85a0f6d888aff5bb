use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;

use crate::{config::Config, config::ConfigManager, core::LedgerEngine};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub engine: LedgerEngine,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub app_dir: PathBuf,
    pub last_command: Option<String>,
    pub running: bool,
}
