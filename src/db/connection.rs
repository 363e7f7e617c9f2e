use sea_orm::DatabaseConnection;
use tracing::info;

use super::{
    dao::{DaoLayerError, DaoResult},
    providers::default_registry,
};
use crate::config::DatabaseConfig;

/// Opens the connection pool for `cfg` and makes sure the `todos` table exists.
///
/// Configuration problems (blank url, unknown scheme, bad pool sizes) are
/// reported before any connection attempt.
pub async fn connect(cfg: &DatabaseConfig) -> DaoResult<DatabaseConnection> {
    cfg.validate()?;
    let provider = default_registry().provider_for_url(&cfg.url)?;

    let db = provider.connect(cfg).await.map_err(DaoLayerError::Db)?;

    info!(backend = provider.id().as_str(), "syncing database schema from entities");
    db.get_schema_registry("todo_api::db::entities::*")
        .sync(&db)
        .await
        .map_err(DaoLayerError::Db)?;
    Ok(db)
}
