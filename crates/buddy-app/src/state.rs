use anyhow::Context;
use buddy_ai::{DraftGenerator, OllamaBackend, OllamaRuntime};
use buddy_config::{AppConfig, ConfigManager};
use buddy_drafts::DraftService;
use buddy_storage::{DiscardedValue, SqliteKvStore, Storage, StorageKeys};
use std::sync::Arc;

pub struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) ollama: OllamaBackend,
    pub(crate) drafts: DraftService,
}

impl AppState {
    pub async fn initialize(
        config_manager: &ConfigManager,
        config: AppConfig,
    ) -> anyhow::Result<Self> {
        let db_path = config_manager.database_path(&config);
        let kv = SqliteKvStore::connect(&db_path)
            .await
            .context("open draft storage")?;
        let storage = Storage::new(Arc::new(kv), storage_keys_from_config(&config))
            .with_corruption_hook(Arc::new(|discarded: &DiscardedValue| {
                tracing::error!(
                    collection = %discarded.collection,
                    key = %discarded.key,
                    "persisted collection was unreadable and has been reset"
                );
            }));

        let runtime = ollama_runtime_from_config(&config)?;
        let ollama = OllamaBackend::new(&runtime).context("configure model endpoint")?;
        let generator = DraftGenerator::new(Arc::new(ollama.clone()), runtime.request_timeout);

        Ok(Self {
            config,
            ollama,
            drafts: DraftService::new(storage, generator),
        })
    }
}

pub(crate) fn ollama_runtime_from_config(config: &AppConfig) -> anyhow::Result<OllamaRuntime> {
    Ok(OllamaRuntime {
        base_url: config.ollama.base_url().context("parse ollama.base_url")?,
        model: config.ollama.model.clone(),
        request_timeout: config.ollama.request_timeout(),
        probe_timeout: config.ollama.probe_timeout(),
    })
}

pub(crate) fn storage_keys_from_config(config: &AppConfig) -> StorageKeys {
    StorageKeys {
        tone_profiles: config.storage.tone_profiles_key.clone(),
        drafts: config.storage.drafts_key.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn runtime_follows_config() {
        let mut config = AppConfig::default();
        config.ollama.model = "llama3.1".to_string();
        config.ollama.request_timeout_secs = 90;

        let runtime = ollama_runtime_from_config(&config).unwrap();
        assert_eq!(runtime.model, "llama3.1");
        assert_eq!(runtime.request_timeout, Duration::from_secs(90));
        assert_eq!(runtime.base_url.as_str(), "http://localhost:11434/");
    }

    #[test]
    fn storage_keys_follow_config() {
        let keys = storage_keys_from_config(&AppConfig::default());
        assert_eq!(keys, StorageKeys::default());
    }

    #[tokio::test]
    async fn initializes_against_fresh_root() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::with_root(dir.path()).unwrap();
        let config = manager.load().unwrap();

        let state = AppState::initialize(&manager, config).await.unwrap();

        assert_eq!(state.ollama.model(), "mistral");
        assert_eq!(state.drafts.catalog().list().await.unwrap().len(), 4);
        assert!(manager.database_path(&state.config).exists());
    }
}
