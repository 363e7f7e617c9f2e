mod mysql;
mod postgres;
mod registry;
mod sqlite;

use std::{sync::Arc, time::Duration};

use sea_orm::ConnectOptions;

pub use registry::{DbProvider, DbProviderId, DbProviders};

use self::{mysql::MySqlDbProvider, postgres::PostgresDbProvider, sqlite::SqliteDbProvider};
use crate::config::DatabaseConfig;

pub fn default_registry() -> DbProviders {
    DbProviders::new()
        .with_provider(Arc::new(PostgresDbProvider))
        .with_provider(Arc::new(MySqlDbProvider))
        .with_provider(Arc::new(SqliteDbProvider))
}

fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(false);
    options
}
