use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "http://localhost:8002";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    ReadError(String),

    #[error("Failed to write configuration: {0}")]
    WriteError(String),

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_seconds: u64,
}

impl AppConfig {
    pub fn base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_seconds: 30,
        }
    }
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load_config(&self) -> ConfigResult<AppConfig>;
    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()>;
}
