pub mod config;
pub mod domain;
pub mod error;
pub mod features;
pub mod io;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, StoreError, StoreResult};
pub use store::SiteStore;

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SiteStore>,
}
