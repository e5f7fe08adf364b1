use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::lookup::{UsdaClient, DEFAULT_BASE_URL, DEMO_API_KEY};
use crate::templates::DEFAULT_DATASET_FILES;

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 10;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Remote nutrition lookup settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LookupConfig {
    /// FoodData Central API key (falls back to the rate-limited DEMO_KEY)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: Option<String>,
}

impl LookupConfig {
    pub fn client(&self) -> UsdaClient {
        UsdaClient::new(
            self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
            self.api_key.as_deref().unwrap_or(DEMO_API_KEY),
        )
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Path to the SQLite database
    pub database_path: ConfigValue<PathBuf>,
    /// Directory holding the food dataset CSV files
    pub dataset_dir: ConfigValue<PathBuf>,
    /// Dataset files to load, in order
    pub dataset_files: ConfigValue<Vec<String>>,
    /// Seconds between background sync checks
    pub sync_interval_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SyncFileConfig {
    check_interval_secs: Option<u64>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    database_path: Option<PathBuf>,
    dataset_dir: Option<PathBuf>,
    dataset_files: Option<Vec<String>>,
    sync: Option<SyncFileConfig>,
    lookup: Option<LookupConfig>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Start with defaults
        let mut database_path = ConfigValue::new(
            Self::default_data_dir().join("nutritrack.db"),
            ConfigSource::Default,
        );
        let mut dataset_dir =
            ConfigValue::new(Self::default_data_dir().join("dataset"), ConfigSource::Default);
        let mut dataset_files = ConfigValue::new(
            DEFAULT_DATASET_FILES.iter().map(|f| f.to_string()).collect(),
            ConfigSource::Default,
        );
        let mut sync_interval_secs =
            ConfigValue::new(DEFAULT_SYNC_INTERVAL_SECS, ConfigSource::Default);
        let mut config_file = None;
        let mut lookup = LookupConfig::default();

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            // Relative paths are resolved against the config file's directory
            let resolve = |p: PathBuf| {
                if p.is_relative() {
                    path.parent().map(|parent| parent.join(&p)).unwrap_or(p)
                } else {
                    p
                }
            };

            if let Some(db_path) = file_config.database_path {
                database_path = ConfigValue::new(resolve(db_path), ConfigSource::File);
            }
            if let Some(dir) = file_config.dataset_dir {
                dataset_dir = ConfigValue::new(resolve(dir), ConfigSource::File);
            }
            if let Some(files) = file_config.dataset_files {
                dataset_files = ConfigValue::new(files, ConfigSource::File);
            }
            if let Some(secs) = file_config.sync.and_then(|s| s.check_interval_secs) {
                sync_interval_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(lookup_config) = file_config.lookup {
                lookup = lookup_config;
            }
        }

        // Apply environment variable overrides
        if let Ok(db_path) = std::env::var("NUTRITRACK_DATABASE_PATH") {
            database_path = ConfigValue::new(PathBuf::from(db_path), ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("NUTRITRACK_DATASET_DIR") {
            dataset_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(secs) = std::env::var("NUTRITRACK_SYNC_INTERVAL") {
            let secs = secs.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "NUTRITRACK_SYNC_INTERVAL",
                value: secs.clone(),
            })?;
            sync_interval_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("NUTRITRACK_USDA_API_KEY") {
            lookup.api_key = Some(key);
        }

        if sync_interval_secs.value == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sync.check_interval_secs",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_path,
            dataset_dir,
            dataset_files,
            sync_interval_secs,
            config_file,
            lookup,
        })
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/nutritrack/
    /// - macOS: ~/Library/Application Support/nutritrack/
    /// - Windows: %APPDATA%/nutritrack/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutritrack")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/nutritrack/
    /// - macOS: ~/Library/Application Support/nutritrack/
    /// - Windows: %APPDATA%/nutritrack/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nutritrack")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value '{}' for {}", value, key)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
