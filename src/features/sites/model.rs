use crate::domain::{EditorLocation, PageCreation, PageSummary, ReconcileReport, ScriptName, SiteManifest};
use crate::error::{ErrorKind, StoreError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Deserialize)]
pub struct CreateSiteRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateSiteRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePageRequest {
    pub page_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub template: String,
    pub style: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdatePageRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct CreateScriptRequest {
    #[serde(default)]
    pub content: String,
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct SiteListResponse {
    pub sites: Vec<SiteManifest>,
}

#[derive(Serialize)]
pub struct SiteResponse {
    pub site: SiteManifest,
}

#[derive(Serialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}

#[derive(Serialize)]
pub struct UpdatedResponse {
    pub updated: bool,
}

#[derive(Serialize)]
pub struct PageListResponse {
    pub pages: Vec<PageSummary>,
}

#[derive(Serialize)]
pub struct PageContentResponse {
    pub content: String,
}

#[derive(Serialize)]
pub struct PageCreatedResponse {
    pub page_id: String,
    pub created: bool,
    pub outcome: PageCreation,
}

#[derive(Serialize)]
pub struct EditorPathResponse {
    #[serde(flatten)]
    pub location: EditorLocation,
}

#[derive(Serialize)]
pub struct ScriptCreatedResponse {
    pub script: ScriptName,
}

#[derive(Serialize)]
pub struct ScriptListResponse {
    pub scripts: Vec<ScriptName>,
}

#[derive(Serialize)]
pub struct ReconcileResponse {
    #[serde(flatten)]
    pub report: ReconcileReport,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// A store error on its way out as an HTTP response.
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Protected => StatusCode::FORBIDDEN,
        ErrorKind::TemplateMissing => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Corrupt
        | ErrorKind::AssetMissing
        | ErrorKind::ReadFailed
        | ErrorKind::WriteFailed
        | ErrorKind::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.kind());
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
