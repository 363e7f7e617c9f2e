use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DbErr};

use super::{
    connect_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

/// MySQL and MySQL-compatible stores (Aurora, MariaDB).
pub struct MySqlDbProvider;

#[async_trait]
impl DbProvider for MySqlDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::MySql
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("mysql://")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
        Database::connect(connect_options(cfg)).await
    }
}
