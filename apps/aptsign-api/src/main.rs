use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use aptsign_api::{app, AppState, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aptsign_api=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing Aptsign API...");
    let config = Config::from_env();
    let port = config.port;
    let state = Arc::new(AppState::new(config)?);

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting Aptsign API on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
