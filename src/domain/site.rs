use crate::domain::ids::{PageId, SiteId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory materialization of `site.json`. Never cached past a single
/// store operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteManifest {
    pub id: SiteId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // navigation order
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

/// One `{ "<page_id>": "<display_name>" }` entry of the manifest's page list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct PageEntry {
    pub id: PageId,
    pub display_name: String,
}

impl TryFrom<BTreeMap<String, String>> for PageEntry {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "page entry must hold exactly one id, found {}",
                map.len()
            ));
        }
        let (id, display_name) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty page entry".to_string())?;
        let id = PageId::parse(&id).map_err(|e| e.to_string())?;
        Ok(PageEntry { id, display_name })
    }
}

impl From<PageEntry> for BTreeMap<String, String> {
    fn from(entry: PageEntry) -> Self {
        BTreeMap::from([(entry.id.into(), entry.display_name)])
    }
}

impl SiteManifest {
    pub fn new(id: SiteId, name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            description,
            created_at: now,
            updated_at: now,
            pages: Vec::new(),
        }
    }

    /// Refresh `updated_at`, never moving it backwards even if the wall clock
    /// does.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn page(&self, id: &PageId) -> Option<&PageEntry> {
        self.pages.iter().find(|entry| &entry.id == id)
    }

    pub fn has_page(&self, id: &PageId) -> bool {
        self.page(id).is_some()
    }

    /// Append a page at the end of the navigation order. Returns false and
    /// leaves the list alone when the id is already registered.
    pub fn register_page(&mut self, id: PageId, display_name: String) -> bool {
        if self.has_page(&id) {
            return false;
        }
        self.pages.push(PageEntry { id, display_name });
        true
    }

    pub fn unregister_page(&mut self, id: &PageId) -> bool {
        let before = self.pages.len();
        self.pages.retain(|entry| &entry.id != id);
        self.pages.len() != before
    }
}
