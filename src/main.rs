use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tower_http::trace::TraceLayer;

use todo_api::{
    config::AppConfig, db::dao::TodoDao, logging::init_tracing, routes::router, state::AppState,
};

#[tokio::main]
async fn main() {
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load config: {err:#}");
            std::process::exit(1);
        }
    };
    init_tracing(&cfg.log_level);

    if let Err(err) = run(cfg).await {
        tracing::error!("server failed: {err:?}");
        std::process::exit(1);
    }
}

async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting todo_api");
    let todo_dao = TodoDao::connect(&cfg.database)
        .await
        .context("failed to open todo store")?;
    let state = AppState::new(todo_dao);

    let app = Router::new()
        .merge(router(state))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .context("invalid host/port")?;
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
