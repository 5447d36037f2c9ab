pub mod ids;
pub mod page;
pub mod site;

pub use ids::{AssetName, PageId, ScriptName, SiteId, INDEX_PAGE};
pub use page::{EditorLocation, PageCreation, PageSummary, ReconcileReport};
pub use site::{PageEntry, SiteManifest};
