use crate::domain::AssetName;
use crate::io::{absent_as_none, AssetBundle, SHARED_SCRIPT_ASSET};
use async_trait::async_trait;
use std::io;
use std::path::PathBuf;

/// Asset bundle laid out on the local filesystem:
/// `<root>/page_mod_scripts.js`, `<root>/templates/<name>.html`,
/// `<root>/styles/<name>.css`.
pub struct LocalAssetBundle {
    pub root_path: PathBuf,
}

impl LocalAssetBundle {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }

    fn template_path(&self, name: &AssetName) -> PathBuf {
        self.root_path.join("templates").join(format!("{name}.html"))
    }

    fn style_path(&self, name: &AssetName) -> PathBuf {
        self.root_path.join("styles").join(format!("{name}.css"))
    }
}

#[async_trait]
impl AssetBundle for LocalAssetBundle {
    async fn shared_script(&self) -> io::Result<Option<Vec<u8>>> {
        absent_as_none(tokio::fs::read(self.root_path.join(SHARED_SCRIPT_ASSET)).await)
    }

    async fn template(&self, name: &AssetName) -> io::Result<Option<String>> {
        absent_as_none(tokio::fs::read_to_string(self.template_path(name)).await)
    }

    async fn style(&self, name: &AssetName) -> io::Result<Option<Vec<u8>>> {
        absent_as_none(tokio::fs::read(self.style_path(name)).await)
    }
}
