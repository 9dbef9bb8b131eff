use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LifelogConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub model: ModelConfig,
    pub chat: ChatConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Trailing window, in days, for category summaries.
    pub summary_window_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// `"openai"` or `"scripted"`.
    pub provider: String,
    pub api_base: String,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChatConfig {
    /// How many recent history turns are surfaced into model context.
    pub history_window: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for LifelogConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            model: ModelConfig::default(),
            chat: ChatConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_lifelog_dir()
            .join("lifelog.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            summary_window_days: 14,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: "openai".into(),
            api_base: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            timeout_secs: 60,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_window: 5 }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: "test".into(),
            password: "test123".into(),
        }
    }
}

/// Returns `~/.lifelog/`
pub fn default_lifelog_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".lifelog")
}

/// Returns the default config file path: `~/.lifelog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_lifelog_dir().join("config.toml")
}

impl LifelogConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            LifelogConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (LIFELOG_DB, LIFELOG_LOG_LEVEL,
    /// LIFELOG_MODEL_PROVIDER).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LIFELOG_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("LIFELOG_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("LIFELOG_MODEL_PROVIDER") {
            self.model.provider = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
