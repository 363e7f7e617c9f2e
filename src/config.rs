use anyhow::{Context, Result};
use thiserror::Error;

const DEFAULT_DEV_DATABASE_URL: &str = "sqlite://todo.db?mode=rwc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("database url must not be empty")]
    EmptyDatabaseUrl,
    #[error(
        "unsupported database url '{0}'; expected scheme postgres://, postgresql://, mysql:// or sqlite:"
    )]
    UnsupportedDatabaseUrl(String),
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
            min_idle: 1,
            connect_timeout_secs: 5,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        if self.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNS",
                reason: "must be > 0".to_string(),
            });
        }
        if self.min_idle > self.max_connections {
            return Err(ConfigError::Invalid {
                key: "DB_MIN_IDLE",
                reason: format!(
                    "{} must be <= DB_MAX_CONNS ({})",
                    self.min_idle, self.max_connections
                ),
            });
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env if present
        let _ = dotenvy::dotenv();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .context("PORT must be a valid u16")?;
        let log_level =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".to_string());

        let url = match std::env::var("DATABASE_URL") {
            Ok(val) => val,
            Err(_) if cfg!(debug_assertions) => DEFAULT_DEV_DATABASE_URL.to_string(),
            Err(err) => {
                Err(anyhow::anyhow!(err)).context("DATABASE_URL is required in release builds")?
            }
        };

        let mut database = DatabaseConfig::new(url);
        database.max_connections = std::env::var("DB_MAX_CONNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(database.max_connections);
        database.min_idle = std::env::var("DB_MIN_IDLE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(database.min_idle);
        database.connect_timeout_secs = std::env::var("DB_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(database.connect_timeout_secs);
        database.validate().context("invalid database config")?;

        Ok(Self {
            host,
            port,
            log_level,
            database,
        })
    }
}
