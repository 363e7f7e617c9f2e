use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DbErr};

use crate::config::{ConfigError, DatabaseConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbProviderId {
    Postgres,
    MySql,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::MySql => "mysql",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr>;
}

/// Backends the todo store can run on, picked by url scheme.
pub struct DbProviders {
    providers: Vec<Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>, ConfigError> {
        if url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        self.providers
            .iter()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| ConfigError::UnsupportedDatabaseUrl(scheme_only(url)))
    }
}

// Connection strings carry credentials; errors only ever show the scheme.
fn scheme_only(url: &str) -> String {
    match url.trim().split_once(':') {
        Some((scheme, rest)) if rest.starts_with("//") => format!("{scheme}://<redacted>"),
        Some((scheme, _)) => format!("{scheme}:<redacted>"),
        None => "<invalid-url>".to_string(),
    }
}
