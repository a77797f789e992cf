use crate::{AppConfig, ConfigError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const ORG: &str = "io";
const AUTHOR: &str = "DraftBuddy";
const APP: &str = "DraftBuddy";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    data_dir: PathBuf,
    wrote_default: bool,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from(ORG, AUTHOR, APP).ok_or(ConfigError::MissingDirectories)?;
        Self::from_dirs(dirs.config_dir().to_path_buf(), dirs.data_dir().to_path_buf())
    }

    /// Keeps config and data side by side under `root`.
    pub fn with_root(root: &Path) -> Result<Self, ConfigError> {
        Self::from_dirs(root.join("config"), root.join("data"))
    }

    fn from_dirs(config_dir: PathBuf, data_dir: PathBuf) -> Result<Self, ConfigError> {
        fs::create_dir_all(&config_dir)?;
        fs::create_dir_all(&data_dir)?;

        let config_path = config_dir.join("config.toml");
        let wrote_default = !config_path.exists();
        if wrote_default {
            let content = toml::to_string_pretty(&AppConfig::default())?;
            fs::write(&config_path, content)?;
        }

        Ok(Self {
            config_path,
            data_dir,
            wrote_default,
        })
    }

    /// True when this manager created `config.toml` because none existed.
    /// Runs before logging is set up, so the caller reports it.
    pub fn wrote_default(&self) -> bool {
        self.wrote_default
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let content = fs::read_to_string(&self.config_path)?;
        let config: AppConfig = toml::from_str(&content)?;
        config.ollama.base_url()?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn database_path(&self, config: &AppConfig) -> PathBuf {
        self.data_dir.join(&config.storage.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigManager;
    use crate::{AppConfig, ConfigError};

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::with_root(dir.path()).expect("manager");

        assert!(manager.config_path().exists());
        assert!(manager.wrote_default());
        assert_eq!(manager.load().expect("load"), AppConfig::default());

        let reopened = ConfigManager::with_root(dir.path()).expect("reopen");
        assert!(!reopened.wrote_default());
    }

    #[test]
    fn save_then_load_keeps_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::with_root(dir.path()).expect("manager");

        let mut config = manager.load().expect("load");
        config.ollama.model = "llama3.1".to_string();
        config.ollama.request_timeout_secs = 30;
        manager.save(&config).expect("save");

        let reopened = ConfigManager::with_root(dir.path()).expect("reopen");
        assert_eq!(reopened.load().expect("reload"), config);
    }

    #[test]
    fn database_lives_in_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::with_root(dir.path()).expect("manager");
        let config = AppConfig::default();

        let path = manager.database_path(&config);
        assert!(path.starts_with(manager.data_dir()));
        assert!(path.ends_with("draftbuddy.sqlite3"));
    }

    #[test]
    fn load_rejects_malformed_endpoint() {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = ConfigManager::with_root(dir.path()).expect("manager");

        let mut config = AppConfig::default();
        config.ollama.base_url = "::nope".to_string();
        manager.save(&config).expect("save");

        assert!(matches!(manager.load(), Err(ConfigError::Url(_))));
    }
}
