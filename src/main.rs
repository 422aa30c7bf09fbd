//! SilkCraft Storefront - saree storefront API

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use silkcraft_storefront::api::{self, AppState};
use silkcraft_storefront::{AppConfig, SessionManager};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AppConfig::from_env()?;
    let sessions = SessionManager::from_config(&config);
    tracing::info!(products = sessions.catalog().len(), page_size = config.page_size, "storefront ready");

    let app = api::router(AppState::new(sessions, config.page_size));
    let addr = config.socket_addr();
    tracing::info!("SilkCraft storefront listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
