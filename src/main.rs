//! Urban Athletics Storefront - single-shoe shop with WhatsApp and email order alerts

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use urban_athletics_storefront::{router, AppState, StorefrontConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "Loaded configuration");
    if config.resend.api_key.is_none() {
        tracing::warn!("RESEND_API_KEY not set, order emails will fail");
    }
    if config.textmebot.api_key.is_none() {
        tracing::warn!("TEXTMEBOT_API_KEY not set, WhatsApp orders will only be logged");
    }

    let state = AppState::from_config(&config).context("failed to build HTTP client")?;
    let app = router(state);

    let addr = config.socket_addr();
    tracing::info!("Urban Athletics storefront listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
