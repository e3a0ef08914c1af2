//! # Configuration Management for Oddsline
//!
//! This crate provides centralized configuration structures for all Oddsline components:
//! the source-of-record database, the Redis cache, the HTTP server and the per-dataset
//! cache policy.
//!
//! ## TOML File Configuration
//! ```toml
//! [database]
//! host = "db.example.supabase.co"
//! port = 5432
//! database = "postgres"
//! username = "postgres"
//! password = "password"
//! min_connections = 1
//! max_connections = 10
//! connection_timeout_seconds = 30
//! idle_timeout_seconds = 600
//! max_lifetime_seconds = 3600
//!
//! [cache]
//! redis_url = "redis://localhost:6379"
//!
//! [server]
//! bind_address = "0.0.0.0:8080"
//!
//! [datasets]
//! hit_streaks_ttl_seconds = 7200
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Load from the file named by ODDSLINE_CONFIG, or ./oddsline.toml
//! let config = AppConfig::load()?;
//!
//! // Or load from custom path
//! let config = AppConfig::from_file("config/production.toml")?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./oddsline.toml";
const CONFIG_PATH_VAR: &str = "ODDSLINE_CONFIG";
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const REDIS_URL_VAR: &str = "REDIS_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Environment variable error: {0}")]
    Env(#[from] env::VarError),
    #[error("Dotenvy error: {0}")]
    Dotenvy(#[from] dotenvy::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub datasets: DatasetConfig,
}

/// Source-of-record database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; wins over the individual fields when set
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_database_port")]
    pub port: u16,
    #[serde(default)]
    pub database: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connection_timeout_seconds: u64,
    pub idle_timeout_seconds: u64,
    pub max_lifetime_seconds: u64,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Bearer token for admin routes; admin routes are disabled when unset
    #[serde(default)]
    pub admin_token: Option<String>,
}

/// Per-dataset cache policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    #[serde(default = "default_hit_streaks_rpc")]
    pub hit_streaks_rpc: String,
    #[serde(default = "default_hit_streaks_ttl")]
    pub hit_streaks_ttl_seconds: u64,
    #[serde(default = "default_alternates_table")]
    pub alternates_table: String,
    #[serde(default = "default_alternates_id_column")]
    pub alternates_id_column: String,
    #[serde(default = "default_alternates_ttl")]
    pub alternates_ttl_seconds: u64,
    #[serde(default = "default_markets_ttl")]
    pub markets_ttl_seconds: u64,
}

fn default_database_port() -> u16 {
    5432
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_hit_streaks_rpc() -> String {
    "get_hit_streaks".to_string()
}

fn default_hit_streaks_ttl() -> u64 {
    7200
}

fn default_alternates_table() -> String {
    "prop_alternates".to_string()
}

fn default_alternates_id_column() -> String {
    "sid".to_string()
}

fn default_alternates_ttl() -> u64 {
    300
}

fn default_markets_ttl() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            admin_token: None,
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            hit_streaks_rpc: default_hit_streaks_rpc(),
            hit_streaks_ttl_seconds: default_hit_streaks_ttl(),
            alternates_table: default_alternates_table(),
            alternates_id_column: default_alternates_id_column(),
            alternates_ttl_seconds: default_alternates_ttl(),
            markets_ttl_seconds: default_markets_ttl(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the TOML file specified in the environment / .env, or defaults
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine; a malformed one is not
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(err.into());
            }
        }

        let mut config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::parse_file(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::parse_file(DEFAULT_CONFIG_PATH)?
        } else {
            return Err(ConfigError::Invalid(format!(
                "Config path must be specified as {} or in {} file",
                CONFIG_PATH_VAR, DEFAULT_CONFIG_PATH
            )));
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::parse_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Connection URLs from the environment take precedence over the file
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(DATABASE_URL_VAR) {
            if !url.is_empty() {
                self.database.url = Some(url);
            }
        }
        if let Ok(url) = env::var(REDIS_URL_VAR) {
            if !url.is_empty() {
                self.cache.redis_url = url;
            }
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        // Database validations
        let has_url = self
            .database
            .url
            .as_deref()
            .is_some_and(|url| !url.is_empty());
        if !has_url {
            if self.database.host.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database host cannot be empty".to_string(),
                ));
            }
            if self.database.port == 0 {
                return Err(ConfigError::Invalid(
                    "Database port cannot be zero".to_string(),
                ));
            }
            if self.database.database.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database name cannot be empty".to_string(),
                ));
            }
            if self.database.username.is_empty() {
                return Err(ConfigError::Invalid(
                    "Database username cannot be empty".to_string(),
                ));
            }
        }
        if self.database.min_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database min_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "Database max_connections must be greater than 0".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid(
                "Database min_connections cannot be greater than max_connections".to_string(),
            ));
        }
        if self.database.connection_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Database connection_timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // Cache validations
        if self.cache.redis_url.is_empty() {
            return Err(ConfigError::Invalid(
                "Redis URL cannot be empty".to_string(),
            ));
        }

        // Server validations
        if self.server.bind_address.is_empty() {
            return Err(ConfigError::Invalid(
                "Server bind_address cannot be empty".to_string(),
            ));
        }
        if self
            .server
            .admin_token
            .as_deref()
            .is_some_and(|token| token.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "Server admin_token cannot be blank; omit it to disable admin routes".to_string(),
            ));
        }

        // Dataset validations
        if self.datasets.hit_streaks_rpc.is_empty() {
            return Err(ConfigError::Invalid(
                "Dataset hit_streaks_rpc cannot be empty".to_string(),
            ));
        }
        if self.datasets.alternates_table.is_empty() || self.datasets.alternates_id_column.is_empty()
        {
            return Err(ConfigError::Invalid(
                "Dataset alternates_table and alternates_id_column cannot be empty".to_string(),
            ));
        }
        if self.datasets.hit_streaks_ttl_seconds == 0
            || self.datasets.alternates_ttl_seconds == 0
            || self.datasets.markets_ttl_seconds == 0
        {
            return Err(ConfigError::Invalid(
                "Dataset TTLs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl CacheConfig {
    /// Create a new cache configuration
    pub fn new(redis_url: String) -> Self {
        Self { redis_url }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Build connection string
    pub fn connection_string(&self) -> String {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!(
                "postgresql://{}:{}@{}:{}/{}",
                self.username, self.password, self.host, self.port, self.database
            ),
        }
    }
}
