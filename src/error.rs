use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Every failure a store operation can surface. Raw I/O errors never escape
/// on their own; they are always wrapped together with the path they concern.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("site {0} not found")]
    SiteNotFound(String),

    #[error("page {page_id} not found in site {site_id}")]
    PageNotFound { site_id: String, page_id: String },

    #[error("script {script} not found for page {page_id} in site {site_id}")]
    ScriptNotFound {
        site_id: String,
        page_id: String,
        script: String,
    },

    #[error("manifest {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("required asset missing from bundle: {0}")]
    AssetMissing(String),

    #[error("template {0} missing from bundle")]
    TemplateMissing(String),

    #[error("failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete {path}: {source}")]
    DeleteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("page {0} is protected and cannot be deleted")]
    Protected(String),
}

/// Coarse classification used by callers that only care about the category,
/// e.g. the HTTP layer choosing a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Corrupt,
    AssetMissing,
    TemplateMissing,
    ReadFailed,
    WriteFailed,
    DeleteFailed,
    Protected,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::SiteNotFound(_)
            | StoreError::PageNotFound { .. }
            | StoreError::ScriptNotFound { .. } => ErrorKind::NotFound,
            StoreError::Corrupt { .. } => ErrorKind::Corrupt,
            StoreError::AssetMissing(_) => ErrorKind::AssetMissing,
            StoreError::TemplateMissing(_) => ErrorKind::TemplateMissing,
            StoreError::ReadFailed { .. } => ErrorKind::ReadFailed,
            StoreError::WriteFailed { .. } => ErrorKind::WriteFailed,
            StoreError::DeleteFailed { .. } => ErrorKind::DeleteFailed,
            StoreError::Protected(_) => ErrorKind::Protected,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::WriteFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn delete(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::DeleteFailed {
            path: path.into(),
            source,
        }
    }
}
