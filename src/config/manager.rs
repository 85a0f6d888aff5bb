use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use super::{Config, ConfigError};

const CONFIG_FILE_NAME: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: &Path) -> Result<Self, ConfigError> {
        fs::create_dir_all(base)?;
        Ok(Self::new(base.join(CONFIG_FILE_NAME)))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        let config = if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        config.validate()?;
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn persists_and_loads_config() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        let cfg = Config {
            site_name: "Tower B".into(),
            recent_transactions_limit: 25,
            ..Config::default()
        };
        manager.save(&cfg).expect("save config");
        assert_eq!(manager.load().expect("load config"), cfg);
        assert!(!tmp_path(manager.config_path()).exists());
    }

    #[test]
    fn malformed_file_is_a_serde_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path()).unwrap();
        fs::write(manager.config_path(), "{ not json").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Serde(_))));
    }
}
