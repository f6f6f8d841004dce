use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILE_PATH: &str = "config.toml";

const DEFAULT_API_BASE: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("upstream API key is not configured (set DEEPSEEK_API_KEY)")]
    MissingApiKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_requests: usize,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            max_concurrent_requests: default_max_concurrent(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config::default();

        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables if they exist
        if let Ok(api_key) = std::env::var("DEEPSEEK_API_KEY") {
            config.api_key = Some(api_key);
        }
        if let Ok(api_base) = std::env::var("DEEPSEEK_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(model) = std::env::var("DEEPSEEK_MODEL") {
            config.model = model;
        }
        if let Ok(timeout) = std::env::var("UPSTREAM_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.trim().parse() {
                config.timeout_secs = secs;
            }
        }
        if let Ok(max) = std::env::var("UPSTREAM_MAX_CONCURRENT") {
            if let Ok(n) = max.trim().parse() {
                config.max_concurrent_requests = n;
            }
        }
        config
    }

    /// A missing or empty API key is a startup-time failure, never per-request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.api_key {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingApiKey),
        }
    }
}
