//! Configuration management for Playslip
//!
//! Configuration is loaded from `config/<environment>.toml`, overridden by
//! `PLAYSLIP_*` environment variables, then validated.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub plays: PlayConfig,
    #[serde(default)]
    pub messages: MessagesConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub environment: Environment,
    pub log_level: String,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

/// Play store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file, or `:memory:`
    pub url: String,
    pub max_connections: u32,
    #[serde(with = "humantime_serde")]
    pub connection_timeout: Duration,
    pub enable_wal: bool,
}

/// Bet catalog client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

/// Play validation and summary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    /// Plays close this many whole minutes before the match starts
    pub closing_window_minutes: i64,
    /// How many plays the latest-plays summary returns
    pub latest_limit: usize,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            closing_window_minutes: 10,
            latest_limit: 5,
        }
    }
}

/// Localization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesConfig {
    pub default_locale: String,
    /// Optional TOML bundle with extra or overriding messages
    pub bundle_path: Option<PathBuf>,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_string(),
            bundle_path: None,
        }
    }
}

/// Environment enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Staging,
    Production,
}

impl Environment {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Environment::Production => "production.toml",
            Environment::Staging => "staging.toml",
            Environment::Testing => "testing.toml",
            Environment::Development => "development.toml",
        }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        let environment =
            Environment::from_name(&env::var("PLAYSLIP_ENV").unwrap_or_default());

        let config_path = Self::get_config_path(&environment);
        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            Self::default_for_environment(environment)
        };

        config.override_from(|key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    fn get_config_path(environment: &Environment) -> PathBuf {
        let base_path =
            env::var("PLAYSLIP_CONFIG_PATH").unwrap_or_else(|_| "config".to_string());
        PathBuf::from(base_path).join(environment.file_name())
    }

    /// Apply `PLAYSLIP_*` overrides through the given variable lookup
    pub fn override_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PLAYSLIP_LOG_LEVEL") {
            self.app.log_level = val;
        }

        if let Some(val) = lookup("PLAYSLIP_LISTEN_ADDRESS") {
            self.server.listen_address = val;
        }

        if let Some(val) = lookup("PLAYSLIP_LISTEN_PORT") {
            self.server.listen_port = val
                .parse()
                .map_err(|_| Error::Config("Invalid listen port".to_string()))?;
        }

        if let Some(val) = lookup("PLAYSLIP_DATABASE_URL") {
            self.database.url = val;
        }

        if let Some(val) = lookup("PLAYSLIP_CATALOG_URL") {
            self.catalog.base_url = val;
        }

        if let Some(val) = lookup("PLAYSLIP_CLOSING_WINDOW_MINUTES") {
            self.plays.closing_window_minutes = val
                .parse()
                .map_err(|_| Error::Config("Invalid closing window".to_string()))?;
        }

        if let Some(val) = lookup("PLAYSLIP_DEFAULT_LOCALE") {
            self.messages.default_locale = val;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "Database max connections must be > 0".to_string(),
            ));
        }

        url::Url::parse(&self.catalog.base_url)
            .map_err(|e| Error::Config(format!("Invalid catalog URL: {}", e)))?;

        if self.plays.closing_window_minutes < 0 {
            return Err(Error::Config(
                "Closing window cannot be negative".to_string(),
            ));
        }

        if self.plays.latest_limit == 0 {
            return Err(Error::Config("Latest plays limit must be > 0".to_string()));
        }

        if self.messages.default_locale.is_empty() {
            return Err(Error::Config("Default locale cannot be empty".to_string()));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)
            .map_err(|e| Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Generate default configuration for an environment
    pub fn default_for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production_defaults(),
            Environment::Staging => Self::staging_defaults(),
            Environment::Testing => Self::testing_defaults(),
            Environment::Development => Self::development_defaults(),
        }
    }

    fn production_defaults() -> Self {
        Config {
            app: AppConfig {
                name: "Playslip".to_string(),
                environment: Environment::Production,
                log_level: "info".to_string(),
            },
            server: ServerConfig {
                listen_address: "0.0.0.0".to_string(),
                listen_port: 8080,
                request_timeout: Duration::from_secs(30),
            },
            database: DatabaseConfig {
                url: "/var/lib/playslip/plays.db".to_string(),
                max_connections: 16,
                connection_timeout: Duration::from_secs(10),
                enable_wal: true,
            },
            catalog: CatalogConfig {
                base_url: "http://bet-catalog:8080".to_string(),
                request_timeout: Duration::from_secs(5),
            },
            plays: PlayConfig::default(),
            messages: MessagesConfig::default(),
        }
    }

    fn development_defaults() -> Self {
        let mut config = Self::production_defaults();
        config.app.environment = Environment::Development;
        config.app.log_level = "debug".to_string();
        config.server.listen_address = "127.0.0.1".to_string();
        config.database.url = "./data/plays.db".to_string();
        config.database.max_connections = 4;
        config.catalog.base_url = "http://localhost:8081".to_string();
        config
    }

    fn staging_defaults() -> Self {
        let mut config = Self::production_defaults();
        config.app.environment = Environment::Staging;
        config.app.log_level = "debug".to_string();
        config
    }

    fn testing_defaults() -> Self {
        let mut config = Self::development_defaults();
        config.app.environment = Environment::Testing;
        config.server.listen_port = 0;
        config.database.url = ":memory:".to_string();
        config.database.max_connections = 1;
        config.database.enable_wal = false;
        config
    }
}
