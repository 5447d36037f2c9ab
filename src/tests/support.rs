use crate::domain::AssetName;
use crate::io::AssetBundle;
use crate::store::SiteStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const SHARED_SCRIPT: &[u8] = b"console.log('page mods');";
pub const BASIC_TEMPLATE: &str = "<main data-page=\"${PAGE_ID}\"><h1>${PAGE_ID}</h1></main>";
pub const BASIC_STYLE: &[u8] = b"main { margin: 0 auto; }";

// --- Manual Mock: AssetBundle ---
// keeps the website-builder bundle in memory so tests control exactly which
// assets exist
#[derive(Clone)]
pub struct MockAssetBundle {
    pub shared_script: Arc<Mutex<Option<Vec<u8>>>>,
    pub templates: Arc<Mutex<HashMap<String, String>>>,
    pub styles: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MockAssetBundle {
    // a bundle with the shared script, a "basic" template and a "basic" style
    pub fn new() -> Self {
        let bundle = Self::empty();
        *bundle.shared_script.lock().unwrap() = Some(SHARED_SCRIPT.to_vec());
        bundle.add_template("basic", BASIC_TEMPLATE);
        bundle.add_style("basic", BASIC_STYLE);
        bundle
    }

    pub fn empty() -> Self {
        Self {
            shared_script: Arc::new(Mutex::new(None)),
            templates: Arc::new(Mutex::new(HashMap::new())),
            styles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn add_template(&self, name: &str, body: &str) {
        let mut templates = self.templates.lock().unwrap();
        templates.insert(name.to_string(), body.to_string());
    }

    pub fn remove_template(&self, name: &str) {
        self.templates.lock().unwrap().remove(name);
    }

    pub fn add_style(&self, name: &str, body: &[u8]) {
        let mut styles = self.styles.lock().unwrap();
        styles.insert(name.to_string(), body.to_vec());
    }
}

#[async_trait]
impl AssetBundle for MockAssetBundle {
    async fn shared_script(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.shared_script.lock().unwrap().clone())
    }

    async fn template(&self, name: &AssetName) -> io::Result<Option<String>> {
        let templates = self.templates.lock().unwrap();
        Ok(templates.get(name.as_str()).cloned())
    }

    async fn style(&self, name: &AssetName) -> io::Result<Option<Vec<u8>>> {
        let styles = self.styles.lock().unwrap();
        Ok(styles.get(name.as_str()).cloned())
    }
}

// a store rooted in a fresh temp dir; the TempDir must outlive the store
pub struct TestStore {
    pub dir: TempDir,
    pub store: Arc<SiteStore>,
    pub assets: MockAssetBundle,
}

impl TestStore {
    pub fn sites_root(&self) -> PathBuf {
        self.dir.path().join("sites")
    }
}

pub async fn test_store() -> TestStore {
    test_store_with(MockAssetBundle::new()).await
}

pub async fn test_store_with(assets: MockAssetBundle) -> TestStore {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = SiteStore::open(dir.path().join("sites"), Box::new(assets.clone()))
        .await
        .expect("Failed to open store");
    TestStore {
        dir,
        store: Arc::new(store),
        assets,
    }
}
