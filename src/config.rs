use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub sites_dir: PathBuf,
    pub asset_bundle_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self> {
        let sites_dir =
            PathBuf::from(std::env::var("SITES_DIR").unwrap_or_else(|_| "../sites".to_string()));

        let asset_bundle_dir = PathBuf::from(
            std::env::var("WEBSITE_BUILDER_PATH")
                .unwrap_or_else(|_| "../ap-website-builder".to_string()),
        );

        // loopback only unless explicitly overridden
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8000".to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR is not a valid socket address")?;

        Ok(Self {
            sites_dir,
            asset_bundle_dir,
            bind_addr,
        })
    }
}
