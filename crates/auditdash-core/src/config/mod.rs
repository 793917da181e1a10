//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::display::DisplayLimits;

/// Service URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/v1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "AUDITDASH_API_URL";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "AUDITDASH_CONFIG_DIR";

/// Auditdash configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Collapsed line limit for raw input and other default blocks
    pub line_limit: usize,
    pub char_limit: usize,
    /// Collapsed line limit for entry text on run pages
    pub entry_line_limit: usize,
    /// Collapsed line limit for entry text on benchmark pages
    pub evaluation_line_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let limits = DisplayLimits::default();
        Self {
            line_limit: limits.line_limit,
            char_limit: limits.char_limit,
            entry_line_limit: 5,
            evaluation_line_limit: 3,
        }
    }
}

impl DisplayConfig {
    /// Limits for blocks that use the defaults
    pub fn limits(&self) -> DisplayLimits {
        DisplayLimits::new(self.line_limit, self.char_limit)
    }

    pub fn entry_limits(&self) -> DisplayLimits {
        self.limits().with_line_limit(self.entry_line_limit)
    }

    pub fn evaluation_limits(&self) -> DisplayLimits {
        self.limits().with_line_limit(self.evaluation_line_limit)
    }
}

impl ApiConfig {
    /// Effective base URL: CLI flag, then `AUDITDASH_API_URL`, then the file
    pub fn resolved_base_url(&self, flag: Option<&str>) -> String {
        self.resolve_base_url(flag, env::var(API_URL_ENV).ok())
    }

    fn resolve_base_url(&self, flag: Option<&str>, env_url: Option<String>) -> String {
        flag.map(str::to_string)
            .or(env_url)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.base_url.clone())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var(CONFIG_DIR_ENV) {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("auditdash")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or use defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be greater than 0"));
        }

        let display = &self.display;
        for (key, value) in [
            ("display.line_limit", display.line_limit),
            ("display.char_limit", display.char_limit),
            ("display.entry_line_limit", display.entry_line_limit),
            ("display.evaluation_line_limit", display.evaluation_line_limit),
        ] {
            if value == 0 {
                return Err(anyhow!("{} must be a positive integer", key));
            }
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "api.base_url" => Ok(self.api.base_url.clone()),
            "api.timeout_secs" => Ok(self.api.timeout_secs.to_string()),

            "display.line_limit" => Ok(self.display.line_limit.to_string()),
            "display.char_limit" => Ok(self.display.char_limit.to_string()),
            "display.entry_line_limit" => Ok(self.display.entry_line_limit.to_string()),
            "display.evaluation_line_limit" => Ok(self.display.evaluation_line_limit.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `auditdash config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "api.base_url" => {
                let url = value.trim();
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(anyhow!("Base URL must start with http:// or https://"));
                }
                self.api.base_url = url.trim_end_matches('/').to_string();
            }
            "api.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                if secs == 0 {
                    return Err(anyhow!("Timeout must be greater than 0"));
                }
                self.api.timeout_secs = secs;
            }

            "display.line_limit" => self.display.line_limit = parse_limit(key, value)?,
            "display.char_limit" => self.display.char_limit = parse_limit(key, value)?,
            "display.entry_line_limit" => self.display.entry_line_limit = parse_limit(key, value)?,
            "display.evaluation_line_limit" => {
                self.display.evaluation_line_limit = parse_limit(key, value)?
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `auditdash config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "api.base_url",
            "api.timeout_secs",
            "display.line_limit",
            "display.char_limit",
            "display.entry_line_limit",
            "display.evaluation_line_limit",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

fn parse_limit(key: &str, value: &str) -> anyhow::Result<usize> {
    let limit: usize = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} value: {}", key, value))?;
    if limit == 0 {
        return Err(anyhow!("{} must be a positive integer", key));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.display.line_limit, 3);
        assert_eq!(config.display.char_limit, 300);
        assert_eq!(config.display.entry_line_limit, 5);
        assert_eq!(config.display.evaluation_line_limit, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_display_limits() {
        let display = DisplayConfig::default();
        assert_eq!(display.limits(), DisplayLimits::default());
        assert_eq!(display.entry_limits(), DisplayLimits::new(5, 300));
        assert_eq!(display.evaluation_limits(), DisplayLimits::new(3, 300));
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        config.set("api.base_url", "https://audit.example/v1/").unwrap();
        assert_eq!(config.get("api.base_url").unwrap(), "https://audit.example/v1");

        config.set("display.entry_line_limit", "8").unwrap();
        assert_eq!(config.get("display.entry_line_limit").unwrap(), "8");
    }

    #[test]
    fn test_set_rejects_invalid_values() {
        let mut config = Config::default();
        assert!(config.set("display.line_limit", "0").is_err());
        assert!(config.set("display.char_limit", "lots").is_err());
        assert!(config.set("api.timeout_secs", "0").is_err());
        assert!(config.set("api.base_url", "ftp://nope").is_err());
        assert!(config.set("llm.default_model", "x").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_list_covers_every_key() {
        let list = Config::default().list().unwrap();
        assert_eq!(list.len(), 6);
        assert_eq!(list[0], ("api.base_url".to_string(), DEFAULT_API_URL.to_string()));
    }

    #[test]
    fn test_base_url_precedence() {
        let api = ApiConfig::default();
        assert_eq!(api.resolve_base_url(None, None), DEFAULT_API_URL);
        assert_eq!(
            api.resolve_base_url(None, Some("http://env/v1".into())),
            "http://env/v1"
        );
        assert_eq!(
            api.resolve_base_url(Some("http://flag/v1"), Some("http://env/v1".into())),
            "http://flag/v1"
        );
        assert_eq!(api.resolve_base_url(None, Some(" ".into())), DEFAULT_API_URL);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("display.char_limit", "120").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nline_limit = 4\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display.line_limit, 4);
        assert_eq!(loaded.display.char_limit, 300);
        assert_eq!(loaded.api, ApiConfig::default());
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\ntimeout_secs = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
