use crate::domain::{
    AssetName, EditorLocation, PageCreation, PageId, PageSummary, ReconcileReport, SiteId,
};
use crate::error::{StoreError, StoreResult};
use crate::io::absent_as_none;
use crate::store::{file_exists, write_atomic, SiteStore};
use chrono::{DateTime, Utc};
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Token in page templates that is replaced by the page id.
pub const PAGE_ID_PLACEHOLDER: &str = "${PAGE_ID}";

impl SiteStore {
    /// Register a page and instantiate its content from a bundle template.
    ///
    /// Re-creating a page that is registered and has content is a no-op that
    /// keeps the existing content. A registered page whose content is missing
    /// gets its content regenerated without touching the manifest.
    ///
    /// The manifest is written before the content file. If the content write
    /// fails the page stays registered without content; readers see it as
    /// not found until a later `create_page` restores it.
    pub async fn create_page(
        &self,
        site_id: &str,
        page_id: &str,
        display_name: &str,
        template: &str,
        style: Option<&str>,
    ) -> StoreResult<PageCreation> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        let template = AssetName::parse(template)?;
        let style = style.map(AssetName::parse).transpose()?;
        let display_name = match display_name.trim() {
            "" => page.to_string(),
            name => name.to_string(),
        };

        let _guard = self.locks.acquire(&site).await;
        let mut manifest = self.load_site(&site).await?;

        let content_path = self.paths.page_content_path(&site, &page);
        let registered = manifest.has_page(&page);
        if registered && file_exists(&content_path).await? {
            debug!(site_id = %site, page_id = %page, "page already exists, leaving it alone");
            return Ok(PageCreation::AlreadyExists);
        }

        // resolve the template before mutating anything
        let body = self
            .assets
            .template(&template)
            .await
            .map_err(|e| StoreError::read(format!("templates/{template}.html"), e))?
            .ok_or_else(|| StoreError::TemplateMissing(template.to_string()))?;
        let content = body.replace(PAGE_ID_PLACEHOLDER, page.as_str());

        if !registered {
            manifest.register_page(page.clone(), display_name);
            manifest.touch();
            self.manifests.write(&site, &manifest).await?;
        }

        write_atomic(&content_path, content.as_bytes()).await?;

        if let Some(style) = style {
            self.copy_page_style(&site, &page, &style).await?;
        }

        if registered {
            info!(site_id = %site, page_id = %page, "restored missing page content");
            Ok(PageCreation::Restored)
        } else {
            info!(site_id = %site, page_id = %page, template = %template, "created page");
            Ok(PageCreation::Created)
        }
    }

    /// Raw content of a registered page. Registration without content and
    /// content without registration are both reported as not found.
    pub async fn read_page(&self, site_id: &str, page_id: &str) -> StoreResult<Vec<u8>> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        let manifest = self.load_site(&site).await?;
        if !manifest.has_page(&page) {
            return Err(page_not_found(&site, &page));
        }

        let path = self.paths.page_content_path(&site, &page);
        absent_as_none(tokio::fs::read(&path).await)
            .map_err(|e| StoreError::read(&path, e))?
            .ok_or_else(|| page_not_found(&site, &page))
    }

    /// Overwrite a registered page's content and bump the site's
    /// `updated_at`. Unregistered pages are rejected so no invisible orphan
    /// content can be written.
    pub async fn update_page_content(
        &self,
        site_id: &str,
        page_id: &str,
        content: &[u8],
    ) -> StoreResult<()> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;

        let _guard = self.locks.acquire(&site).await;
        let mut manifest = self.load_site(&site).await?;
        if !manifest.has_page(&page) {
            return Err(page_not_found(&site, &page));
        }

        write_atomic(&self.paths.page_content_path(&site, &page), content).await?;
        manifest.touch();
        self.manifests.write(&site, &manifest).await?;

        debug!(site_id = %site, page_id = %page, bytes = content.len(), "updated page content");
        Ok(())
    }

    /// Unregister a page, then remove its files. The index page is protected.
    /// File removal after the manifest write is best effort and only logged.
    pub async fn delete_page(&self, site_id: &str, page_id: &str) -> StoreResult<()> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;

        let _guard = self.locks.acquire(&site).await;
        let mut manifest = self.load_site(&site).await?;
        if page.is_index() {
            return Err(StoreError::Protected(page.to_string()));
        }
        if !manifest.unregister_page(&page) {
            return Err(page_not_found(&site, &page));
        }
        manifest.touch();
        self.manifests.write(&site, &manifest).await?;

        remove_file_logged(&self.paths.page_content_path(&site, &page)).await;
        remove_file_logged(&self.paths.page_style_path(&site, &page)).await;
        let scripts = self.paths.page_scripts_dir(&site, &page);
        if let Err(e) = tokio::fs::remove_dir_all(&scripts).await {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %scripts.display(), error = %e, "failed to remove page scripts");
            }
        }

        info!(site_id = %site, page_id = %page, "deleted page");
        Ok(())
    }

    /// Absolute location of a registered page's content file.
    pub async fn editor_path(&self, site_id: &str, page_id: &str) -> StoreResult<EditorLocation> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        let manifest = self.load_site(&site).await?;
        if !manifest.has_page(&page) {
            return Err(page_not_found(&site, &page));
        }

        let path = self.paths.page_content_path(&site, &page);
        let path = std::path::absolute(&path).map_err(|e| StoreError::read(&path, e))?;
        let exists = file_exists(&path).await?;
        Ok(EditorLocation { path, exists })
    }

    /// Registered pages in navigation order. Pages whose content file is
    /// missing are left out.
    pub async fn list_pages(&self, site_id: &str) -> StoreResult<Vec<PageSummary>> {
        let site = SiteId::parse(site_id)?;
        let manifest = self.load_site(&site).await?;

        let mut pages = Vec::with_capacity(manifest.pages.len());
        for entry in manifest.pages {
            let path = self.paths.page_content_path(&site, &entry.id);
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable page");
                    continue;
                }
            };
            pages.push(PageSummary {
                id: entry.id,
                name: entry.display_name,
                site_id: site.clone(),
                modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        Ok(pages)
    }

    /// Maintenance pass: delete `.html`/`.css` files in the editor directory
    /// that belong to no registered page, and report registered pages that
    /// have no content.
    pub async fn reconcile_site(&self, site_id: &str) -> StoreResult<ReconcileReport> {
        let site = SiteId::parse(site_id)?;
        let _guard = self.locks.acquire(&site).await;
        let manifest = self.load_site(&site).await?;

        let mut report = ReconcileReport::default();
        let editor = self.paths.editor_dir(&site);
        match tokio::fs::read_dir(&editor).await {
            Ok(mut entries) => {
                while let Some(entry) = entries
                    .next_entry()
                    .await
                    .map_err(|e| StoreError::read(&editor, e))?
                {
                    let is_file = entry.file_type().await.is_ok_and(|t| t.is_file());
                    let path = entry.path();
                    if !is_file || !is_page_file(&path) {
                        continue;
                    }
                    let owned = path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .and_then(|stem| PageId::parse(stem).ok())
                        .is_some_and(|page| manifest.has_page(&page));
                    if owned {
                        continue;
                    }
                    match tokio::fs::remove_file(&path).await {
                        Ok(()) => report.removed.push(path),
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "failed to remove orphan")
                        }
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::read(&editor, e)),
        }

        for entry in &manifest.pages {
            if !file_exists(&self.paths.page_content_path(&site, &entry.id)).await? {
                report.missing_content.push(entry.id.clone());
            }
        }

        info!(
            site_id = %site,
            removed = report.removed.len(),
            missing = report.missing_content.len(),
            "reconciled site"
        );
        Ok(report)
    }

    // styles are optional: a missing or unreadable bundle style is skipped
    async fn copy_page_style(&self, site: &SiteId, page: &PageId, style: &AssetName) -> StoreResult<()> {
        match self.assets.style(style).await {
            Ok(Some(bytes)) => write_atomic(&self.paths.page_style_path(site, page), &bytes).await,
            Ok(None) => {
                debug!(style = %style, "style not in bundle, skipping");
                Ok(())
            }
            Err(e) => {
                warn!(style = %style, error = %e, "could not read style, skipping");
                Ok(())
            }
        }
    }
}

fn page_not_found(site: &SiteId, page: &PageId) -> StoreError {
    StoreError::PageNotFound {
        site_id: site.to_string(),
        page_id: page.to_string(),
    }
}

fn is_page_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("html") | Some("css")
    )
}

async fn remove_file_logged(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove page file");
        }
    }
}
