use crate::domain::AssetName;
use async_trait::async_trait;
use std::io;

pub mod local;

/// File name of the shared script copied into every new site's editor dir.
pub const SHARED_SCRIPT_ASSET: &str = "page_mod_scripts.js";

// the website-builder asset bundle is owned by someone else; the store only
// ever reads from it. `Ok(None)` means the asset is absent, `Err` means it
// exists but could not be read.
#[async_trait]
pub trait AssetBundle: Send + Sync {
    async fn shared_script(&self) -> io::Result<Option<Vec<u8>>>;
    async fn template(&self, name: &AssetName) -> io::Result<Option<String>>;
    async fn style(&self, name: &AssetName) -> io::Result<Option<Vec<u8>>>;
}

/// Collapse "file not found" into `None`, keep every other error.
pub(crate) fn absent_as_none<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
