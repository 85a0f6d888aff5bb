use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ConfigError;

const DATA_FILE_NAME: &str = "materials_data.json";
const BACKUP_DIR_NAME: &str = "backups";

/// Stores user-configurable site and CLI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_site_name")]
    pub site_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom inventory file. Defaults to `<app dir>/materials_data.json`.
    pub data_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom backup directory. Defaults to `<app dir>/backups`.
    pub backups_dir: Option<PathBuf>,

    #[serde(default = "Config::default_backup_retention")]
    pub backup_retention: usize,

    #[serde(default = "Config::default_recent_transactions_limit")]
    pub recent_transactions_limit: usize,

    #[serde(default = "Config::default_receipt_source")]
    pub default_receipt_source: String,

    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            data_file: None,
            backups_dir: None,
            backup_retention: Self::default_backup_retention(),
            recent_transactions_limit: Self::default_recent_transactions_limit(),
            default_receipt_source: Self::default_receipt_source(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_site_name() -> String {
        "L&T Site".into()
    }

    pub fn default_backup_retention() -> usize {
        10
    }

    pub fn default_recent_transactions_limit() -> usize {
        10
    }

    pub fn default_receipt_source() -> String {
        "Office".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_data_file(&self, app_dir: &Path) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| app_dir.join(DATA_FILE_NAME))
    }

    pub fn resolve_backups_dir(&self, app_dir: &Path) -> PathBuf {
        self.backups_dir
            .clone()
            .unwrap_or_else(|| app_dir.join(BACKUP_DIR_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site_name.trim().is_empty() {
            return Err(ConfigError::Invalid("site_name must not be empty".into()));
        }
        if self.backup_retention == 0 {
            return Err(ConfigError::Invalid(
                "backup_retention must be at least 1".into(),
            ));
        }
        if self.recent_transactions_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_transactions_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
