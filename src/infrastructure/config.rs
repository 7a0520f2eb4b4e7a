//! Configuration infrastructure
//!
//! Contains configuration loading for the showtime feed.
//!
//! Resolution order:
//! 1. An explicit file passed on the command line
//! 2. `<config dir>/showtime-calendar/config.json` when present
//! 3. Built-in defaults
//!
//! Every section is optional in the file; missing keys take their defaults.

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::constants::{showtime, site};
use crate::infrastructure::parsing::ListingSelectors;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listing source and event defaults
    pub source: SourceConfig,

    /// Page fetcher settings
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// CSS selectors of the listing markup
    pub selectors: ListingSelectors,
}

/// Listing source settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// What's-on page to scrape
    pub url: String,

    /// IANA timezone the cinema publishes times in
    pub timezone: String,

    /// Calendar display name
    pub calendar_name: String,

    /// Runtime used for films without a runtime badge
    pub default_runtime_minutes: u32,
}

/// Page fetcher settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Delay before the first retry, grows linearly per attempt
    pub retry_delay_ms: u64,

    /// User agent string
    pub user_agent: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console (stderr) output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for log files, defaults to `logs/` beside the executable
    pub log_dir: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: site::LISTING_URL.to_string(),
            timezone: site::TIMEZONE.to_string(),
            calendar_name: site::CALENDAR_NAME.to_string(),
            default_runtime_minutes: showtime::DEFAULT_RUNTIME_MINUTES,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_retries: defaults::MAX_RETRIES,
            retry_delay_ms: defaults::RETRY_DELAY_MS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Timezone of the listing, parsed from its IANA name
    pub fn timezone(&self) -> Result<Tz> {
        self.source
            .timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Unknown timezone '{}': {}", self.source.timezone, e))
    }

    /// Replace the listing URL and timezone with command-line values
    #[must_use]
    pub fn with_source_overrides(mut self, url: Option<String>, timezone: Option<String>) -> Self {
        if let Some(url) = url {
            self.source.url = url;
        }
        if let Some(timezone) = timezone {
            self.source.timezone = timezone;
        }
        self
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        self.timezone()?;
        url::Url::parse(&self.source.url)
            .with_context(|| format!("Invalid source URL '{}'", self.source.url))?;
        if self.source.default_runtime_minutes == 0 {
            return Err(anyhow!("default_runtime_minutes must be greater than zero"));
        }
        if self.source.calendar_name.trim().is_empty() {
            return Err(anyhow!("calendar_name must not be empty"));
        }
        Ok(())
    }
}

/// Configuration manager for locating and loading settings
pub struct ConfigManager {
    pub config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get user config directory")?
            .join("showtime-calendar");

        Ok(config_dir)
    }

    /// Use `explicit` when given, else the per-user config file if it exists
    pub fn new(explicit: Option<PathBuf>) -> Self {
        let config_path = explicit.or_else(|| {
            Self::get_config_dir()
                .ok()
                .map(|dir| dir.join("config.json"))
                .filter(|path| path.exists())
        });

        Self { config_path }
    }

    /// Load the configuration. Call `AppConfig::validate` once overrides are applied.
    pub async fn load_config(&self) -> Result<AppConfig> {
        match &self.config_path {
            Some(path) => Self::read_config_file(path).await,
            None => Ok(AppConfig::default()),
        }
    }

    async fn read_config_file(path: &Path) -> Result<AppConfig> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }
}

/// Default configuration values
pub mod defaults {
    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default retries for a failed page fetch
    pub const MAX_RETRIES: u32 = 3;

    /// Default delay before the first retry in milliseconds
    pub const RETRY_DELAY_MS: u64 = 2000;

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default user agent
    pub const USER_AGENT: &str = concat!(
        "showtime-calendar/",
        env!("CARGO_PKG_VERSION"),
        " (calendar feed generator)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::London);
        assert_eq!(config.source.default_runtime_minutes, 90);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "source": { "timezone": "America/New_York" } }"#).unwrap();
        assert_eq!(config.timezone().unwrap(), chrono_tz::America::New_York);
        assert_eq!(config.source.url, site::LISTING_URL);
        assert_eq!(config.http, HttpConfig::default());
        assert_eq!(config.selectors, ListingSelectors::default());
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut config = AppConfig::default();
        config.source.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.source.default_runtime_minutes = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.source.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "source": {{ "calendar_name": "Late Shows" }} }}"#).unwrap();

        let manager = ConfigManager::new(Some(file.path().to_path_buf()));
        let config = manager.load_config().await.unwrap();
        assert_eq!(config.source.calendar_name, "Late Shows");
    }

    #[tokio::test]
    async fn test_override_rescues_bad_file_timezone() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "source": {{ "timezone": "Mars/Olympus" }} }}"#).unwrap();

        let manager = ConfigManager::new(Some(file.path().to_path_buf()));
        let config = manager.load_config().await.unwrap();
        assert!(config.validate().is_err());

        let config = config.with_source_overrides(None, Some("Europe/Paris".to_string()));
        assert!(config.validate().is_ok());
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Paris);
        assert_eq!(config.source.url, site::LISTING_URL);
    }

    #[test]
    fn test_url_override_is_validated() {
        let config =
            AppConfig::default().with_source_overrides(Some("not a url".to_string()), None);
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let manager = ConfigManager::new(Some(file.path().to_path_buf()));
        assert!(manager.load_config().await.is_err());
    }
}
