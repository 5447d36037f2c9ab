use crate::domain::{SiteId, SiteManifest};
use crate::error::{StoreError, StoreResult};
use crate::io::absent_as_none;
use crate::store::paths::SitePaths;
use crate::store::write_atomic;
use serde::de::Error as _;

/// Whole-file read and write of `site.json`. No field-level update: callers
/// read, mutate, and write back while holding the site's lock.
pub struct ManifestStore {
    paths: SitePaths,
}

impl ManifestStore {
    pub fn new(paths: SitePaths) -> Self {
        Self { paths }
    }

    /// `Ok(None)` when the manifest (or the whole site directory) is gone,
    /// `Err(Corrupt)` when it exists but does not parse.
    pub async fn read(&self, site: &SiteId) -> StoreResult<Option<SiteManifest>> {
        let path = self.paths.manifest_path(site);
        let bytes = match absent_as_none(tokio::fs::read(&path).await)
            .map_err(|e| StoreError::read(&path, e))?
        {
            Some(bytes) => bytes,
            None => return Ok(None),
        };

        let manifest: SiteManifest = match serde_json::from_slice(&bytes) {
            Ok(manifest) => manifest,
            Err(source) => return Err(StoreError::Corrupt { path, source }),
        };

        // a manifest copied in from another site would silently alias it
        if &manifest.id != site {
            return Err(StoreError::Corrupt {
                source: serde_json::Error::custom(format!(
                    "manifest id {} does not match directory {}",
                    manifest.id, site
                )),
                path,
            });
        }

        Ok(Some(manifest))
    }

    pub async fn write(&self, site: &SiteId, manifest: &SiteManifest) -> StoreResult<()> {
        let path = self.paths.manifest_path(site);
        let bytes =
            serde_json::to_vec_pretty(manifest).map_err(|e| StoreError::write(&path, e.into()))?;
        write_atomic(&path, &bytes).await
    }
}
