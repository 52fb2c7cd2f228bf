use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};

#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    api_base_url: Option<String>,
    request_timeout_seconds: Option<u64>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self {
            config_path: config_dir.join("taskpad").join("config.json"),
        })
    }

    #[cfg(test)]
    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            // No config file yet is not an error; run with defaults.
            Ok(content) => content,
            Err(_) => return Ok(AppConfig::default()),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            api_base_url: config_file.api_base_url,
            request_timeout_seconds: config_file
                .request_timeout_seconds
                .unwrap_or(defaults.request_timeout_seconds),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            api_base_url: config.api_base_url.clone(),
            request_timeout_seconds: Some(config.request_timeout_seconds),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn config_round_trips_through_the_file() {
        let path = std::env::temp_dir()
            .join(format!("taskpad-config-test-{}", std::process::id()))
            .join("config.json");
        let store = FileConfigStore::with_path(path.clone());

        let config = AppConfig {
            api_base_url: Some("http://localhost:9000".to_string()),
            request_timeout_seconds: 10,
        };
        assert_ok!(store.save_config(&config).await);

        let loaded = store.load_config().await.unwrap();
        assert_eq!(loaded.api_base_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(loaded.request_timeout_seconds, 10);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn garbled_config_is_reported_not_ignored() {
        let dir = std::env::temp_dir().join(format!("taskpad-garbled-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileConfigStore::with_path(path);
        let err = store.load_config().await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));

        let _ = std::fs::remove_dir_all(dir);
    }
}
