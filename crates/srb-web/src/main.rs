//! SRB Console Web Server
//!
//! Run with: cargo run -p srb-web

use std::net::SocketAddr;
use std::sync::Arc;

use srb_engine::{Console, HttpDataApi};
use srb_web::config::ConsoleConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,srb_engine=debug,srb_web=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    let config = ConsoleConfig::load()?;
    info!(api = %config.api.base_url, "Starting SRB console...");

    let api = Arc::new(HttpDataApi::new(&config.api_settings())?);
    let console = match Console::load(api, config.console_settings()).await {
        Ok(console) => console,
        Err(e) => {
            error!("Failed to load data: {}", e);
            return Err(e.into());
        }
    };

    let app = srb_web::router::build_router(srb_web::state::AppState::new(console));

    let addr: SocketAddr = config.server.listen_addr.parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
