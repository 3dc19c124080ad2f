//! Configuration — YAML config + env var overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform data dir
const APP_DIR_NAME: &str = "tabdeck";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where `storage.json` lives
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Open-Meteo geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Language for resolved place names
    #[serde(default = "default_language")]
    pub language: String,

    /// HTTP client timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Simulated latency before a fact is shown
    #[serde(default = "default_fact_delay")]
    pub fact_delay_ms: u64,

    /// Simulated latency before the assistant answers
    #[serde(default = "default_chat_delay")]
    pub chat_delay_ms: u64,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".tabdeck"))
}
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".into()
}
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}
fn default_language() -> String {
    "ru".into()
}
fn default_request_timeout() -> u64 {
    15
}
fn default_fact_delay() -> u64 {
    500
}
fn default_chat_delay() -> u64 {
    800
}

impl Config {
    /// Load config from a YAML file with env var overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let mut config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config.yaml")?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load `config.yaml` from a directory, or fall back to defaults (plus env
    /// overrides) when the file does not exist.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join("config.yaml");
        if config_path.is_file() {
            return Self::load(&config_path);
        }
        let config = Self::from_env();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus env var overrides, no file. Also the fallback when
    /// `config.yaml` is unusable, so `TABDECK_DATA_DIR` still applies.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = var("TABDECK_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = var("TABDECK_GEOCODING_URL") {
            self.geocoding_url = url;
        }
        if let Some(url) = var("TABDECK_FORECAST_URL") {
            self.forecast_url = url;
        }
        if let Some(lang) = var("TABDECK_LANGUAGE") {
            self.language = lang;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.geocoding_url.trim().is_empty() {
            anyhow::bail!("geocoding_url must not be empty");
        }
        if self.forecast_url.trim().is_empty() {
            anyhow::bail!("forecast_url must not be empty");
        }
        Ok(())
    }

    /// Path of the key-value file inside `data_dir`
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join("storage.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn fact_delay(&self) -> Duration {
        Duration::from_millis(self.fact_delay_ms)
    }

    pub fn chat_delay(&self) -> Duration {
        Duration::from_millis(self.chat_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            language: default_language(),
            request_timeout_seconds: default_request_timeout(),
            fact_delay_ms: default_fact_delay(),
            chat_delay_ms: default_chat_delay(),
        }
    }
}
