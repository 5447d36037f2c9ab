use crate::error::ErrorKind;
use crate::tests::support::test_store;

#[tokio::test]
async fn test_create_script_with_name_round_trips() {
    let t = test_store().await;
    let site = t.store.create_site("Scripts", None).await.unwrap();
    let site_id = site.id.as_str();

    let name = t
        .store
        .create_script(site_id, "index", b"document.title = 'x';", Some("title.js"))
        .await
        .unwrap();
    assert_eq!(name.as_str(), "title.js");
    assert_eq!(
        t.store.read_script(site_id, "index", "title.js").await.unwrap(),
        b"document.title = 'x';"
    );
    assert!(t
        .sites_root()
        .join(site_id)
        .join("page_mod_scripts/index/title.js")
        .is_file());

    // overwrite in place
    t.store
        .create_script(site_id, "index", b"v2", Some("title.js"))
        .await
        .unwrap();
    assert_eq!(
        t.store.read_script(site_id, "index", "title.js").await.unwrap(),
        b"v2"
    );
}

#[tokio::test]
async fn test_create_script_generates_name() {
    let t = test_store().await;
    let site = t.store.create_site("Scripts", None).await.unwrap();
    let site_id = site.id.as_str();

    let first = t
        .store
        .create_script(site_id, "index", b"1", None)
        .await
        .unwrap();
    let second = t
        .store
        .create_script(site_id, "index", b"2", None)
        .await
        .unwrap();
    assert!(first.as_str().starts_with("mod-"));
    assert_ne!(first, second);

    let listed = t.store.list_scripts(site_id, "index").await.unwrap();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn test_create_script_rejects_bad_input() {
    let t = test_store().await;
    let site = t.store.create_site("Scripts", None).await.unwrap();
    let site_id = site.id.as_str();

    let err = t
        .store
        .create_script(site_id, "index", b"", Some("a.js"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = t
        .store
        .create_script(site_id, "index", b"x", Some("../../site.json"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = t
        .store
        .create_script("0b7e4c1a-6f0d-4a55-9c1e-2f3b9d8a7e10", "index", b"x", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_scripts_do_not_touch_the_manifest() {
    let t = test_store().await;
    let site = t.store.create_site("Scripts", None).await.unwrap();
    let site_id = site.id.as_str();

    t.store
        .create_script(site_id, "unregistered", b"x", Some("a.js"))
        .await
        .unwrap();
    assert_eq!(t.store.get_site(site_id).await.unwrap(), site);
}

#[tokio::test]
async fn test_read_missing_script_is_not_found() {
    let t = test_store().await;
    let site = t.store.create_site("Scripts", None).await.unwrap();
    let site_id = site.id.as_str();

    let err = t
        .store
        .read_script(site_id, "index", "nope.js")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(t.store.list_scripts(site_id, "index").await.unwrap().is_empty());
}
