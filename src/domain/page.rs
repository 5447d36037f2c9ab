use crate::domain::ids::{PageId, SiteId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// A registered page whose content file exists, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub id: PageId,
    pub name: String,
    pub site_id: SiteId,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Where a page's content file lives, for tooling that edits it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorLocation {
    pub path: PathBuf,
    pub exists: bool,
}

/// Outcome of `create_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageCreation {
    /// Registered and content written.
    Created,
    /// Already registered with content on disk; nothing was touched.
    AlreadyExists,
    /// Registered but contentless; content regenerated, manifest untouched.
    Restored,
}

/// Result of a reconcile pass over one site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Orphan content/style files that were removed.
    pub removed: Vec<PathBuf>,
    /// Registered pages with no content file.
    pub missing_content: Vec<PageId>,
}
