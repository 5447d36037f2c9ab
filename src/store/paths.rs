//! Canonical on-disk locations for sites and their contents.
//!
//! Pure path arithmetic: nothing here touches the filesystem. Only validated
//! identifiers are accepted, so every path produced stays under the sites
//! root.
use crate::domain::{PageId, ScriptName, SiteId};
use crate::io::SHARED_SCRIPT_ASSET;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "site.json";
pub const EDITOR_DIR: &str = "editor";
pub const SCRIPTS_DIR: &str = "page_mod_scripts";

#[derive(Debug, Clone)]
pub struct SitePaths {
    root: PathBuf,
}

impl SitePaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The sites root that every other path hangs off.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<site>/`
    pub fn site_dir(&self, site: &SiteId) -> PathBuf {
        self.root.join(site.as_str())
    }

    /// `<root>/<site>/site.json`
    pub fn manifest_path(&self, site: &SiteId) -> PathBuf {
        self.site_dir(site).join(MANIFEST_FILE)
    }

    /// `<root>/<site>/editor/`
    pub fn editor_dir(&self, site: &SiteId) -> PathBuf {
        self.site_dir(site).join(EDITOR_DIR)
    }

    /// `<root>/<site>/editor/<page>.html`
    pub fn page_content_path(&self, site: &SiteId, page: &PageId) -> PathBuf {
        self.editor_dir(site).join(format!("{page}.html"))
    }

    /// `<root>/<site>/editor/<page>.css`
    pub fn page_style_path(&self, site: &SiteId, page: &PageId) -> PathBuf {
        self.editor_dir(site).join(format!("{page}.css"))
    }

    /// `<root>/<site>/editor/page_mod_scripts.js`
    pub fn shared_script_path(&self, site: &SiteId) -> PathBuf {
        self.editor_dir(site).join(SHARED_SCRIPT_ASSET)
    }

    /// `<root>/<site>/page_mod_scripts/`
    pub fn scripts_dir(&self, site: &SiteId) -> PathBuf {
        self.site_dir(site).join(SCRIPTS_DIR)
    }

    /// `<root>/<site>/page_mod_scripts/<page>/`
    pub fn page_scripts_dir(&self, site: &SiteId, page: &PageId) -> PathBuf {
        self.scripts_dir(site).join(page.as_str())
    }

    /// `<root>/<site>/page_mod_scripts/<page>/<script>`
    pub fn script_path(&self, site: &SiteId, page: &PageId, script: &ScriptName) -> PathBuf {
        self.page_scripts_dir(site, page).join(script.as_str())
    }
}
