//! tiller-server — store management API
//!
//! Long-running service that:
//! - Serves the REST JSON API (JWT authenticated) for the browser frontend
//! - Owns the PostgreSQL schema (migrations run at startup)
//! - Executes the transactional sale / inventory flows
//! - Renders sale tickets as PDF documents

use tiller_server::api;
use tiller_server::core::{AppState, Config};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiller_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting tiller-server (env: {})", config.environment);

    // Initialize application state (pool, migrations, bootstrap admin)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("tiller-server HTTP listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
