use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;

use crate::{config::DatabaseConfig, db::dao::TodoDao, routes::router, state::AppState};

/// Single-connection in-memory SQLite; every pooled connection would
/// otherwise see its own empty database.
pub fn in_memory_config() -> DatabaseConfig {
    let mut cfg = DatabaseConfig::new("sqlite::memory:");
    cfg.max_connections = 1;
    cfg.min_idle = 1;
    cfg
}

pub async fn sqlite_state() -> Arc<AppState> {
    let todo_dao = TodoDao::connect(&in_memory_config())
        .await
        .expect("open in-memory todo store");
    AppState::new(todo_dao)
}

pub fn state_for(db: DatabaseConnection) -> Arc<AppState> {
    AppState::new(TodoDao::from_connection(db))
}

pub fn test_router(state: &Arc<AppState>) -> Router {
    router(Arc::clone(state))
}
