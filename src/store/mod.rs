//! The site & page content store.
//!
//! `SiteStore` is constructed once with an injected sites root and asset
//! bundle, and shared (usually behind an `Arc`) by every caller. It keeps no
//! site state in memory: each operation re-reads the manifest from disk.
//! Mutations of one site's manifest are serialized through [`SiteLocks`].

use crate::domain::{SiteId, SiteManifest};
use crate::error::{StoreError, StoreResult};
use crate::io::AssetBundle;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

pub mod locks;
pub mod manifest;
pub mod pages;
pub mod paths;
pub mod scripts;
pub mod sites;

pub use locks::{SiteGuard, SiteLocks};
pub use manifest::ManifestStore;
pub use paths::SitePaths;

pub struct SiteStore {
    paths: SitePaths,
    manifests: ManifestStore,
    assets: Box<dyn AssetBundle>,
    locks: SiteLocks,
}

impl SiteStore {
    pub fn new(sites_root: PathBuf, assets: Box<dyn AssetBundle>) -> Self {
        let paths = SitePaths::new(sites_root);
        Self {
            manifests: ManifestStore::new(paths.clone()),
            paths,
            assets,
            locks: SiteLocks::new(),
        }
    }

    /// Build the store and make sure the sites root exists. The root is never
    /// removed by the store.
    pub async fn open(sites_root: PathBuf, assets: Box<dyn AssetBundle>) -> StoreResult<Self> {
        tokio::fs::create_dir_all(&sites_root)
            .await
            .map_err(|e| StoreError::write(&sites_root, e))?;
        info!(root = %sites_root.display(), "opened site store");
        Ok(Self::new(sites_root, assets))
    }

    pub fn paths(&self) -> &SitePaths {
        &self.paths
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    pub fn locks(&self) -> &SiteLocks {
        &self.locks
    }

    // the manifest, or SiteNotFound when it is absent
    async fn load_site(&self, site: &SiteId) -> StoreResult<SiteManifest> {
        self.manifests
            .read(site)
            .await?
            .ok_or_else(|| StoreError::SiteNotFound(site.to_string()))
    }
}

/// Replace `path` so that readers see either the old or the new bytes, never
/// a torn write: write a uniquely named sibling, then rename over the target.
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("staged");
    let tmp_path = parent.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    let staged = async {
        tokio::fs::write(&tmp_path, bytes).await?;
        tokio::fs::rename(&tmp_path, path).await
    };
    if let Err(e) = staged.await {
        // a partial write may have left the sibling behind
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            if cleanup.kind() != io::ErrorKind::NotFound {
                warn!(path = %tmp_path.display(), error = %cleanup, "failed to remove staged file");
            }
        }
        return Err(StoreError::write(path, e));
    }
    Ok(())
}

pub(crate) async fn file_exists(path: &Path) -> StoreResult<bool> {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => Ok(exists),
        // a vanished parent directory is just "not there"
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StoreError::read(path, e)),
    }
}
