use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_RETRY_SECS: u64 = 600;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub telegram: TelegramSettings,
    pub log: LogSettings,
    /// File the settings were read from; `None` when defaults were used.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoint: String,
    pub retry_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            retry_secs: DEFAULT_RETRY_SECS,
        }
    }
}

impl ApiSettings {
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub api_url: String,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub journald: bool,
    pub to_file: bool,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            json: false,
            journald: false,
            to_file: true,
            file: None,
        }
    }
}

impl LogSettings {
    /// Log file named after the program unless `file` overrides it.
    pub fn file_path(&self) -> Option<PathBuf> {
        if !self.to_file {
            return None;
        }
        self.file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join(APP_NAME).join(format!("{APP_NAME}.log")))
        })
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME).join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        settings.source = Some(path.to_path_buf());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.retry_secs == 0 {
            anyhow::bail!("api.retry_secs must be greater than 0");
        }
        reqwest::Url::parse(&self.api.endpoint)
            .with_context(|| format!("api.endpoint is not a valid URL: {}", self.api.endpoint))?;
        reqwest::Url::parse(&self.telegram.api_url).with_context(|| {
            format!(
                "telegram.api_url is not a valid URL: {}",
                self.telegram.api_url
            )
        })?;
        Ok(())
    }
}
