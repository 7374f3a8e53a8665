use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_PATH_VAR: &str = "WTREND_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "weather-trends.toml";
pub const DEFAULT_DB_PATH: &str = "./weather.db";
pub const DEFAULT_COVERAGE_THRESHOLD: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, or ":memory:"
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_DB_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CoverageMode {
    /// Backfill when fewer than `threshold` days are stored
    #[default]
    Count,
    /// Backfill when any elapsed day of the year is missing
    EveryDay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverageConfig {
    pub mode: CoverageMode,
    pub threshold: u64,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            mode: CoverageMode::Count,
            threshold: DEFAULT_COVERAGE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub coverage: CoverageConfig,
    pub logging: LoggingConfig,
    /// Weather service credential. Accepted but not used yet.
    pub api_key: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

impl AppConfig {
    /// Load from the TOML file named by WTREND_CONFIG (default
    /// `weather-trends.toml`) if present, then apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let cfg = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<AppConfig>(s)?)
    }

    /// Apply overrides from `lookup` (normally the process environment):
    /// WTREND_DB_PATH, WTREND_COVERAGE_MODE, WTREND_COVERAGE_THRESHOLD,
    /// WTREND_LOG_FORMAT, WEATHER_API_KEY
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("WTREND_DB_PATH") {
            self.database.path = path;
        }

        if let Some(mode) = lookup("WTREND_COVERAGE_MODE") {
            self.coverage.mode = match mode.trim() {
                "count" => CoverageMode::Count,
                "every-day" => CoverageMode::EveryDay,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "WTREND_COVERAGE_MODE",
                        value: mode,
                    })
                }
            };
        }

        if let Some(threshold) = lookup("WTREND_COVERAGE_THRESHOLD") {
            self.coverage.threshold =
                threshold
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid {
                        key: "WTREND_COVERAGE_THRESHOLD",
                        value: threshold.clone(),
                    })?;
        }

        if let Some(format) = lookup("WTREND_LOG_FORMAT") {
            self.logging.format = match format.trim() {
                "plain" => LogFormat::Plain,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "WTREND_LOG_FORMAT",
                        value: format,
                    })
                }
            };
        }

        if let Some(key) = lookup("WEATHER_API_KEY").filter(|k| !k.is_empty()) {
            self.api_key = Some(key);
        }

        Ok(self)
    }
}
