use crate::core::{AppError, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub default_page_limit: i64,
    pub max_page_limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::Configuration(format!(
                "Invalid LOG_FORMAT '{}'",
                other
            ))),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            default_page_limit: 100,
            max_page_limit: 1000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = AppConfig::default();

        Ok(AppConfig {
            env: env::var("APP_ENV").unwrap_or(defaults.env),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: match env::var("LOG_FORMAT") {
                Ok(value) => value.parse()?,
                Err(_) => defaults.log_format,
            },
            default_page_limit: parse_var("DEFAULT_PAGE_LIMIT", defaults.default_page_limit)?,
            max_page_limit: parse_var("MAX_PAGE_LIMIT", defaults.max_page_limit)?,
        })
    }

    /// Clamp a requested page size to the configured bounds
    pub fn page_limit(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_page_limit)
            .clamp(1, self.max_page_limit)
    }
}

/// Read an environment variable and parse it, falling back to `default` when unset
pub(crate) fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.app.default_page_limit <= 0 || self.app.max_page_limit <= 0 {
            return Err(AppError::Configuration(
                "Page limits must be greater than 0".to_string(),
            ));
        }

        if self.app.default_page_limit > self.app.max_page_limit {
            return Err(AppError::Configuration(
                "DEFAULT_PAGE_LIMIT cannot exceed MAX_PAGE_LIMIT".to_string(),
            ));
        }

        if self.database.pool_size == 0 || self.database.max_connections == 0 {
            return Err(AppError::Configuration(
                "Database pool size must be greater than 0".to_string(),
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
