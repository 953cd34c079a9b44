use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParleyConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub logging: LoggingConfig,
    pub tui: TuiConfig,
}

/// What to do when the backend answers 2xx with a body that does not fit the contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Surface `ChatError::MalformedResponse` to the controller.
    #[default]
    Fail,
    /// Substitute the simulator's reply.
    Simulate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Unset or empty means no backend: replies come from the simulator.
    pub base_url: Option<String>,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    pub malformed_policy: MalformedPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub status_reset_delay_ms: u64,
    /// 0 disables polling.
    pub status_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    pub theme: String,
    pub tick_rate_ms: u64,
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_connect_timeout() -> u64 {
    2_000
}

fn default_status_reset_delay() -> u64 {
    1_200
}

fn default_status_poll_interval() -> u64 {
    5_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_theme() -> String {
    "dark".to_string()
}

fn default_tick_rate() -> u64 {
    250
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_ms: default_request_timeout(),
            connect_timeout_ms: default_connect_timeout(),
            malformed_policy: MalformedPolicy::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            status_reset_delay_ms: default_status_reset_delay(),
            status_poll_interval_ms: default_status_poll_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            tick_rate_ms: default_tick_rate(),
        }
    }
}

pub const VALID_THEMES: [&str; 2] = ["dark", "light"];

impl ParleyConfig {
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from_paths(get_config_paths())
    }

    pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<Self, ConfigLoadError> {
        load_dotenv_files();

        let mut builder = ConfigBuilder::builder();

        for path in paths {
            if path.exists() {
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("PARLEY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut parley_config: ParleyConfig = builder.build()?.try_deserialize()?;

        if let Ok(url) = std::env::var("PARLEY_API_BASE_URL") {
            parley_config.backend.base_url = Some(url);
        }

        if let Ok(level) = std::env::var("PARLEY_LOG_LEVEL") {
            parley_config.logging.level = level;
        }

        parley_config.validate()?;

        Ok(parley_config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(url) = self.base_url() {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigLoadError::InvalidValue {
                    key: "backend.base_url".to_string(),
                    message: format!("'{}' must start with http:// or https://", url),
                });
            }
        }

        if self.backend.request_timeout_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "backend.request_timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.backend.connect_timeout_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "backend.connect_timeout_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        if self.tui.tick_rate_ms == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "tui.tick_rate_ms".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let theme = self.tui.theme.to_lowercase();
        if !VALID_THEMES.contains(&theme.as_str()) {
            return Err(ConfigLoadError::InvalidValue {
                key: "tui.theme".to_string(),
                message: format!(
                    "Unknown theme '{}'. Must be one of: {:?}",
                    self.tui.theme, VALID_THEMES
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level_lower = self.logging.level.to_lowercase();
        if !valid_levels.contains(&level_lower.as_str()) && !level_lower.contains('=') {
            return Err(ConfigLoadError::InvalidValue {
                key: "logging.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Must be one of: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        Ok(())
    }

    /// The configured base URL without trailing slashes, or `None` when unset or blank.
    pub fn base_url(&self) -> Option<&str> {
        self.backend
            .base_url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.connect_timeout_ms)
    }

    pub fn status_reset_delay(&self) -> Duration {
        Duration::from_millis(self.chat.status_reset_delay_ms)
    }

    pub fn status_poll_interval(&self) -> Option<Duration> {
        match self.chat.status_poll_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tui.tick_rate_ms)
    }

    pub fn log_level(&self) -> &str {
        &self.logging.level
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join("config").join("default.toml"));
        paths.push(cwd.join("config").join("local.toml"));
        paths.push(cwd.join("parley.toml"));
    }

    if let Some(config_dir) = get_config_dir() {
        paths.push(config_dir.join("config.toml"));
    }

    paths
}

fn load_dotenv_files() {
    let mut env_paths = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        env_paths.push(cwd.join(".env"));
        env_paths.push(cwd.join(".env.local"));
    }

    if let Some(config_dir) = get_config_dir() {
        env_paths.push(config_dir.join(".env"));
    }

    for path in env_paths {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("parley"))
}

pub fn get_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join("parley"))
}

pub fn ensure_cache_dir() -> Result<PathBuf, std::io::Error> {
    let cache_dir = get_cache_dir().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine cache directory",
        )
    })?;

    if !cache_dir.exists() {
        std::fs::create_dir_all(&cache_dir)?;
    }

    Ok(cache_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parley.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = ParleyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url(), None);
        assert_eq!(config.status_reset_delay(), Duration::from_millis(1200));
        assert_eq!(config.status_poll_interval(), Some(Duration::from_secs(5)));
        assert_eq!(config.backend.malformed_policy, MalformedPolicy::Fail);
        assert_eq!(config.tui.theme, "dark");
    }

    #[test]
    fn test_base_url_normalization() {
        let mut config = ParleyConfig::default();
        config.backend.base_url = Some("http://localhost:8000//".to_string());
        assert_eq!(config.base_url(), Some("http://localhost:8000"));

        config.backend.base_url = Some("   ".to_string());
        assert_eq!(config.base_url(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = ParleyConfig::default();
        config.backend.base_url = Some("ftp://example.com".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend.base_url"));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = ParleyConfig::default();
        config.tui.theme = "sepia".to_string();
        assert!(config.validate().is_err());

        let mut config = ParleyConfig::default();
        config.backend.request_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = ParleyConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = ParleyConfig::default();
        config.logging.level = "parley_core=debug".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_poll_interval_zero_disables() {
        let mut config = ParleyConfig::default();
        config.chat.status_poll_interval_ms = 0;
        assert_eq!(config.status_poll_interval(), None);
    }

    #[test]
    fn test_load_from_file() {
        let (_dir, path) = write_config(
            r#"
[backend]
base_url = "https://chat.example.com/"
malformed_policy = "simulate"

[chat]
status_reset_delay_ms = 300

[tui]
theme = "light"
"#,
        );

        let config = ParleyConfig::load_from_paths(vec![path]).unwrap();
        if std::env::var("PARLEY_API_BASE_URL").is_err() {
            assert_eq!(config.base_url(), Some("https://chat.example.com"));
        }
        assert_eq!(config.backend.malformed_policy, MalformedPolicy::Simulate);
        assert_eq!(config.chat.status_reset_delay_ms, 300);
        assert_eq!(config.chat.status_poll_interval_ms, 5_000);
        assert_eq!(config.tui.theme, "light");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            ParleyConfig::load_from_paths(vec![dir.path().join("absent.toml")]).unwrap();
        assert_eq!(config.chat.status_reset_delay_ms, 1_200);
    }

    #[test]
    fn test_load_invalid_file_value_fails() {
        let (_dir, path) = write_config("[tui]\ntick_rate_ms = 0\n");
        assert!(ParleyConfig::load_from_paths(vec![path]).is_err());
    }
}
