use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use padelclub::config::AppConfig;
use padelclub::db;
use padelclub::handlers;
use padelclub::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    if config.admin_token.is_empty() {
        tracing::warn!("ADMIN_TOKEN not set; no bootstrap admin will be created");
    } else if db::queries::ensure_admin_user(&conn, &config.admin_token)? {
        tracing::info!("bootstrap admin user created");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let state = Arc::new(AppState::new(conn, config));
    let app = handlers::router(state);

    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
