use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub todos: u64,
}

/// Reports store reachability; a store failure surfaces as a 500.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let todos = state.todo_service().count().await?;
    Ok(Json(HealthResponse { ok: true, todos }))
}
