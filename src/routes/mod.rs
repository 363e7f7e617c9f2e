use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

pub mod public;
pub mod todo;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(public::router(state.clone()))
        .merge(todo::router(state))
}
