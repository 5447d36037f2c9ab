use anyhow::Context;
use site_store::config::StoreConfig;
use site_store::features::app_router;
use site_store::io::local::LocalAssetBundle;
use site_store::{AppState, SiteStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // determine environment variables
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = StoreConfig::from_env()?;

    let assets = LocalAssetBundle::new(config.asset_bundle_dir.clone());
    let store = SiteStore::open(config.sites_dir.clone(), Box::new(assets))
        .await
        .with_context(|| format!("Unable to open sites directory {}", config.sites_dir.display()))?;

    let app = app_router(AppState {
        store: Arc::new(store),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Unable to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
