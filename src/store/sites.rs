use crate::domain::{SiteId, SiteManifest};
use crate::error::{StoreError, StoreResult};
use crate::io::SHARED_SCRIPT_ASSET;
use crate::store::{file_exists, write_atomic, SiteStore};
use std::io;
use tracing::{debug, error, info, warn};

// uuid v4 collisions are astronomically unlikely; a few retries is plenty
const MAX_ID_ATTEMPTS: usize = 3;

impl SiteStore {
    /// Create a new site with an empty page list and return its manifest as
    /// re-read from disk.
    pub async fn create_site(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> StoreResult<SiteManifest> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("site name is required".into()));
        }

        // fetch the shared script before touching the disk so a missing asset
        // leaves nothing behind
        let shared_script = self
            .assets
            .shared_script()
            .await
            .map_err(|e| StoreError::read(SHARED_SCRIPT_ASSET, e))?
            .ok_or_else(|| StoreError::AssetMissing(SHARED_SCRIPT_ASSET.to_string()))?;

        let site = self.allocate_site_dir().await?;
        let manifest = SiteManifest::new(
            site.clone(),
            name.to_string(),
            description.unwrap_or_default().to_string(),
        );

        self.initialize_or_discard(&manifest, &shared_script).await?;

        info!(site_id = %site, name, "created site");
        self.load_site(&site).await
    }

    pub async fn get_site(&self, site_id: &str) -> StoreResult<SiteManifest> {
        let site = SiteId::parse(site_id)?;
        self.load_site(&site).await
    }

    /// Merge the supplied fields into the manifest. Fields left as `None` are
    /// untouched; with nothing supplied the manifest is returned as is.
    pub async fn update_site(
        &self,
        site_id: &str,
        name: Option<&str>,
        description: Option<&str>,
    ) -> StoreResult<SiteManifest> {
        let site = SiteId::parse(site_id)?;
        let name = name.map(str::trim);
        if name.is_some_and(str::is_empty) {
            return Err(StoreError::Validation("site name must not be empty".into()));
        }

        let _guard = self.locks.acquire(&site).await;
        let mut manifest = self.load_site(&site).await?;

        if name.is_none() && description.is_none() {
            return Ok(manifest);
        }
        if let Some(name) = name {
            manifest.name = name.to_string();
        }
        if let Some(description) = description {
            manifest.description = description.to_string();
        }
        manifest.touch();
        self.manifests.write(&site, &manifest).await?;

        info!(site_id = %site, "updated site");
        Ok(manifest)
    }

    /// Remove the site's whole subtree. A failed removal is reported, never
    /// treated as success.
    pub async fn delete_site(&self, site_id: &str) -> StoreResult<()> {
        let site = SiteId::parse(site_id)?;
        let _guard = self.locks.acquire(&site).await;

        let dir = self.paths.site_dir(&site);
        if !file_exists(&dir).await? {
            return Err(StoreError::SiteNotFound(site.to_string()));
        }
        tokio::fs::remove_dir_all(&dir)
            .await
            .map_err(|e| StoreError::delete(&dir, e))?;

        info!(site_id = %site, "deleted site");
        Ok(())
    }

    /// Every site with a readable manifest, oldest first. Directories without
    /// a manifest, or with a corrupt one, are skipped.
    pub async fn list_sites(&self) -> StoreResult<Vec<SiteManifest>> {
        let root = self.paths.root();
        let mut entries = match tokio::fs::read_dir(root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::read(root, e)),
        };

        let mut sites = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::read(root, e))?
        {
            match entry.file_type().await {
                Ok(file_type) if file_type.is_dir() => {}
                _ => continue,
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let Ok(site) = SiteId::parse(&name) else {
                debug!(dir = %name, "ignoring directory that is not a site id");
                continue;
            };

            match self.manifests.read(&site).await {
                Ok(Some(manifest)) => sites.push(manifest),
                Ok(None) => debug!(site_id = %site, "skipping site without manifest"),
                Err(e) => warn!(site_id = %site, error = %e, "skipping unreadable site"),
            }
        }

        sites.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(sites)
    }

    async fn allocate_site_dir(&self) -> StoreResult<SiteId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let site = SiteId::generate();
            let dir = self.paths.site_dir(&site);
            match tokio::fs::create_dir(&dir).await {
                Ok(()) => return Ok(site),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    warn!(site_id = %site, "site id collision, retrying");
                }
                Err(e) => return Err(StoreError::write(&dir, e)),
            }
        }
        Err(StoreError::write(
            self.paths.root(),
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "could not allocate a unique site id",
            ),
        ))
    }

    /// Populate a freshly allocated site directory. On failure the whole
    /// directory is removed again and the setup error is returned.
    pub(crate) async fn initialize_or_discard(
        &self,
        manifest: &SiteManifest,
        shared_script: &[u8],
    ) -> StoreResult<()> {
        let result = self.initialize_site(manifest, shared_script).await;
        if result.is_err() {
            self.discard_partial_site(&manifest.id).await;
        }
        result
    }

    async fn initialize_site(&self, manifest: &SiteManifest, shared_script: &[u8]) -> StoreResult<()> {
        let site = &manifest.id;
        let editor = self.paths.editor_dir(site);
        tokio::fs::create_dir_all(&editor)
            .await
            .map_err(|e| StoreError::write(&editor, e))?;

        write_atomic(&self.paths.shared_script_path(site), shared_script).await?;
        self.manifests.write(site, manifest).await
    }

    // best effort; the caller still returns its own error
    async fn discard_partial_site(&self, site: &SiteId) {
        let dir = self.paths.site_dir(site);
        if let Err(e) = tokio::fs::remove_dir_all(&dir).await {
            if e.kind() != io::ErrorKind::NotFound {
                error!(
                    site_id = %site,
                    path = %dir.display(),
                    error = %e,
                    "failed to clean up partially created site"
                );
            }
        }
    }
}
