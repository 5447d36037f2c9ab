use crate::domain::{PageId, ScriptName, SiteId};
use crate::error::{StoreError, StoreResult};
use crate::io::absent_as_none;
use crate::store::{write_atomic, SiteStore};
use std::io;
use tracing::info;

// scripts live outside the manifest: a script exists iff its file does

impl SiteStore {
    /// Store a modification script for a page, overwriting any script of the
    /// same name. Without a name one is generated. Returns the name to
    /// retrieve it by.
    pub async fn create_script(
        &self,
        site_id: &str,
        page_id: &str,
        content: &[u8],
        script_name: Option<&str>,
    ) -> StoreResult<ScriptName> {
        if content.is_empty() {
            return Err(StoreError::Validation("script content is required".into()));
        }
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        let script = match script_name {
            Some(name) => ScriptName::parse(name)?,
            None => ScriptName::generate(),
        };

        // held so a concurrent delete_site cannot race the directory creation
        let _guard = self.locks.acquire(&site).await;
        self.load_site(&site).await?;

        let dir = self.paths.page_scripts_dir(&site, &page);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::write(&dir, e))?;
        write_atomic(&self.paths.script_path(&site, &page, &script), content).await?;

        info!(site_id = %site, page_id = %page, script = %script, "stored script");
        Ok(script)
    }

    pub async fn read_script(
        &self,
        site_id: &str,
        page_id: &str,
        script_name: &str,
    ) -> StoreResult<Vec<u8>> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        let script = ScriptName::parse(script_name)?;
        self.load_site(&site).await?;

        let path = self.paths.script_path(&site, &page, &script);
        absent_as_none(tokio::fs::read(&path).await)
            .map_err(|e| StoreError::read(&path, e))?
            .ok_or_else(|| StoreError::ScriptNotFound {
                site_id: site.to_string(),
                page_id: page.to_string(),
                script: script.to_string(),
            })
    }

    /// Names of the page's scripts, sorted.
    pub async fn list_scripts(&self, site_id: &str, page_id: &str) -> StoreResult<Vec<ScriptName>> {
        let site = SiteId::parse(site_id)?;
        let page = PageId::parse(page_id)?;
        self.load_site(&site).await?;

        let dir = self.paths.page_scripts_dir(&site, &page);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::read(&dir, e)),
        };

        let mut scripts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::read(&dir, e))?
        {
            if !entry.file_type().await.is_ok_and(|t| t.is_file()) {
                continue;
            }
            // temp files from an in-flight write start with '.' and fail to parse
            if let Some(script) = entry
                .file_name()
                .to_str()
                .and_then(|name| ScriptName::parse(name).ok())
            {
                scripts.push(script);
            }
        }
        scripts.sort();
        Ok(scripts)
    }
}
