use crate::domain::{PageEntry, PageId, SiteId, SiteManifest};
use crate::error::{ErrorKind, StoreError};
use crate::store::{write_atomic, ManifestStore, SiteLocks, SitePaths};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tempfile::TempDir;

fn manifest_store(dir: &TempDir, site: &SiteId) -> ManifestStore {
    let paths = SitePaths::new(dir.path().to_path_buf());
    std::fs::create_dir_all(paths.site_dir(site)).unwrap();
    ManifestStore::new(paths)
}

#[test]
fn test_page_entry_serializes_as_single_key_object() {
    let entry = PageEntry {
        id: PageId::parse("about").unwrap(),
        display_name: "About Us".into(),
    };
    assert_eq!(
        serde_json::to_string(&entry).unwrap(),
        r#"{"about":"About Us"}"#
    );

    let parsed: PageEntry = serde_json::from_str(r#"{"contact":"Contact"}"#).unwrap();
    assert_eq!(parsed.id.as_str(), "contact");
    assert_eq!(parsed.display_name, "Contact");

    assert!(serde_json::from_str::<PageEntry>(r#"{"a":"A","b":"B"}"#).is_err());
    assert!(serde_json::from_str::<PageEntry>(r#"{}"#).is_err());
}

#[test]
fn test_register_page_refuses_duplicates_and_keeps_order() {
    let mut manifest = SiteManifest::new(SiteId::generate(), "Site".into(), String::new());
    assert!(manifest.register_page(PageId::parse("index").unwrap(), "Home".into()));
    assert!(manifest.register_page(PageId::parse("about").unwrap(), "About".into()));
    assert!(!manifest.register_page(PageId::parse("index").unwrap(), "Again".into()));

    let ids: Vec<&str> = manifest.pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["index", "about"]);
    assert_eq!(manifest.pages[0].display_name, "Home");

    assert!(manifest.unregister_page(&PageId::parse("index").unwrap()));
    assert!(!manifest.unregister_page(&PageId::parse("index").unwrap()));
    assert_eq!(manifest.pages.len(), 1);
}

#[test]
fn test_touch_never_moves_updated_at_backwards() {
    let mut manifest = SiteManifest::new(SiteId::generate(), "Site".into(), String::new());
    let future = Utc::now() + Duration::hours(1);
    manifest.updated_at = future;
    manifest.touch();
    assert_eq!(manifest.updated_at, future);

    let before = manifest.created_at;
    manifest.updated_at = before;
    manifest.touch();
    assert!(manifest.updated_at >= before);
}

#[tokio::test]
async fn test_manifest_read_absent_is_none() {
    let dir = TempDir::new().unwrap();
    let site = SiteId::generate();
    let store = ManifestStore::new(SitePaths::new(dir.path().to_path_buf()));

    // neither the site directory nor the manifest exist
    assert!(store.read(&site).await.unwrap().is_none());

    let store = manifest_store(&dir, &site);
    assert!(store.read(&site).await.unwrap().is_none());
}

#[tokio::test]
async fn test_manifest_write_then_read_round_trips() {
    let dir = TempDir::new().unwrap();
    let site = SiteId::generate();
    let store = manifest_store(&dir, &site);

    let mut manifest = SiteManifest::new(site.clone(), "Gallery".into(), "photos".into());
    manifest.register_page(PageId::parse("index").unwrap(), "Home".into());
    store.write(&site, &manifest).await.unwrap();

    let read = store.read(&site).await.unwrap().unwrap();
    assert_eq!(read, manifest);

    // the temp file used for the atomic replace is gone
    let leftovers: Vec<_> = std::fs::read_dir(dir.path().join(site.as_str()))
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["site.json".to_string()]);
}

#[tokio::test]
async fn test_manifest_on_disk_shape() {
    let dir = TempDir::new().unwrap();
    let site = SiteId::generate();
    let store = manifest_store(&dir, &site);

    let mut manifest = SiteManifest::new(site.clone(), "Shop".into(), String::new());
    manifest.register_page(PageId::parse("index").unwrap(), "Home".into());
    store.write(&site, &manifest).await.unwrap();

    let raw = std::fs::read_to_string(dir.path().join(site.as_str()).join("site.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["id"], site.as_str());
    assert_eq!(value["name"], "Shop");
    assert_eq!(value["pages"], serde_json::json!([{ "index": "Home" }]));
    assert!(value["created_at"].is_string());
    assert!(value["updated_at"].is_string());
}

#[tokio::test]
async fn test_manifest_corrupt_is_distinguished_from_absent() {
    let dir = TempDir::new().unwrap();
    let site = SiteId::generate();
    let store = manifest_store(&dir, &site);
    let path = dir.path().join(site.as_str()).join("site.json");

    std::fs::write(&path, b"{\"id\": \"trunc").unwrap();
    let err = store.read(&site).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Corrupt);
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[tokio::test]
async fn test_manifest_with_foreign_id_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let site = SiteId::generate();
    let other = SiteId::generate();
    let store = manifest_store(&dir, &site);

    let manifest = SiteManifest::new(other, "Elsewhere".into(), String::new());
    std::fs::write(
        dir.path().join(site.as_str()).join("site.json"),
        serde_json::to_vec(&manifest).unwrap(),
    )
    .unwrap();

    let err = store.read(&site).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Corrupt);
}

#[tokio::test]
async fn test_site_locks_forget_idle_entries() {
    let locks = Arc::new(SiteLocks::new());
    let site = SiteId::generate();

    let guard = locks.acquire(&site).await;
    assert_eq!(locks.tracked(), 1);
    drop(guard);
    assert_eq!(locks.tracked(), 0);

    // a waiter keeps the entry alive until it is done too
    let guard = locks.acquire(&site).await;
    let waiter = {
        let locks = locks.clone();
        let site = site.clone();
        tokio::spawn(async move {
            let _guard = locks.acquire(&site).await;
        })
    };
    tokio::task::yield_now().await;
    drop(guard);
    waiter.await.unwrap();
    assert_eq!(locks.tracked(), 0);
}

#[tokio::test]
async fn test_failed_atomic_write_leaves_no_staged_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("page.html");
    std::fs::create_dir(&target).unwrap();
    std::fs::write(target.join("inner"), b"x").unwrap();

    let err = write_atomic(&target, b"<p>new</p>").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::WriteFailed);

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, vec![std::ffi::OsString::from("page.html")]);
}
