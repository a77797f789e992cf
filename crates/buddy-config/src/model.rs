use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub version: u32,
    pub ollama: OllamaConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Upper bound for a single generation call.
    pub request_timeout_secs: u64,
    pub probe_timeout_ms: u64,
}

impl OllamaConfig {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_url)?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            request_timeout_secs: 480,
            probe_timeout_ms: 3_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub file_name: String,
    pub tone_profiles_key: String,
    pub drafts_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: "draftbuddy.sqlite3".to_string(),
            tone_profiles_key: "email_draft_buddy_tone_profiles".to_string(),
            drafts_key: "email_draft_buddy_drafts".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            ollama: OllamaConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_ollama() {
        let config = AppConfig::default();
        let url = config.ollama.base_url().expect("default url parses");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(11434));
        assert_eq!(config.ollama.request_timeout(), Duration::from_secs(480));
    }

    #[test]
    fn logging_section_is_optional() {
        let raw = r#"
            version = 1

            [ollama]
            base_url = "http://127.0.0.1:11434"
            model = "llama3.1"
            request_timeout_secs = 60
            probe_timeout_ms = 500

            [storage]
            file_name = "drafts.sqlite3"
            tone_profiles_key = "tones"
            drafts_key = "drafts"
        "#;
        let config: AppConfig = toml::from_str(raw).expect("config parses");
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.ollama.model, "llama3.1");
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let config = OllamaConfig {
            base_url: "not a url".to_string(),
            ..OllamaConfig::default()
        };
        assert!(matches!(config.base_url(), Err(ConfigError::Url(_))));
    }
}
