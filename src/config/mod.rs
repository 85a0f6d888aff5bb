//! Site configuration and the application data directory.

mod error;
mod manager;
mod model;

use dirs::home_dir;
use std::{env, path::PathBuf};

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;

const DEFAULT_DIR_NAME: &str = ".site_inventory";
pub const HOME_ENV: &str = "SITE_INVENTORY_HOME";

/// Returns the application data directory, defaulting to `~/.site_inventory`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}
