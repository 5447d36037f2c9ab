pub mod model;

use crate::domain::PageCreation;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use model::{
    ApiError, CreatePageRequest, CreateScriptRequest, CreateSiteRequest, DeletedResponse,
    EditorPathResponse, PageContentResponse, PageCreatedResponse, PageListResponse,
    ReconcileResponse, ScriptCreatedResponse, ScriptListResponse, SiteListResponse, SiteResponse,
    UpdatePageRequest, UpdateSiteRequest, UpdatedResponse,
};

pub fn sites_router() -> Router<AppState> {
    Router::new()
        .route("/sites", get(list_sites_handler).post(create_site_handler))
        .route(
            "/sites/{site_id}",
            get(get_site_handler)
                .put(update_site_handler)
                .delete(delete_site_handler),
        )
        .route("/sites/{site_id}/reconcile", post(reconcile_handler))
        .route(
            "/sites/{site_id}/pages",
            get(list_pages_handler).post(create_page_handler),
        )
        .route(
            "/sites/{site_id}/pages/{page_id}",
            get(get_page_handler)
                .put(update_page_handler)
                .delete(delete_page_handler),
        )
        .route(
            "/sites/{site_id}/pages/{page_id}/raw",
            get(get_page_raw_handler),
        )
        .route(
            "/sites/{site_id}/pages/{page_id}/editor",
            get(editor_path_handler),
        )
        .route(
            "/sites/{site_id}/pages/{page_id}/scripts",
            get(list_scripts_handler).post(create_script_handler),
        )
        .route(
            "/sites/{site_id}/pages/{page_id}/scripts/{name}",
            get(get_script_handler),
        )
}

async fn list_sites_handler(
    State(state): State<AppState>,
) -> Result<Json<SiteListResponse>, ApiError> {
    let sites = state.store.list_sites().await?;
    Ok(Json(SiteListResponse { sites }))
}

async fn create_site_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateSiteRequest>,
) -> Result<Json<SiteResponse>, ApiError> {
    let site = state
        .store
        .create_site(&body.name, body.description.as_deref())
        .await?;
    Ok(Json(SiteResponse { site }))
}

async fn get_site_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<SiteResponse>, ApiError> {
    let site = state.store.get_site(&site_id).await?;
    Ok(Json(SiteResponse { site }))
}

async fn update_site_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Json(body): Json<UpdateSiteRequest>,
) -> Result<Json<SiteResponse>, ApiError> {
    let site = state
        .store
        .update_site(&site_id, body.name.as_deref(), body.description.as_deref())
        .await?;
    Ok(Json(SiteResponse { site }))
}

async fn delete_site_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.store.delete_site(&site_id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

async fn reconcile_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let report = state.store.reconcile_site(&site_id).await?;
    Ok(Json(ReconcileResponse { report }))
}

async fn list_pages_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
) -> Result<Json<PageListResponse>, ApiError> {
    let pages = state.store.list_pages(&site_id).await?;
    Ok(Json(PageListResponse { pages }))
}

async fn create_page_handler(
    State(state): State<AppState>,
    Path(site_id): Path<String>,
    Json(body): Json<CreatePageRequest>,
) -> Result<Json<PageCreatedResponse>, ApiError> {
    let outcome = state
        .store
        .create_page(
            &site_id,
            &body.page_id,
            &body.display_name,
            &body.template,
            body.style.as_deref(),
        )
        .await?;
    Ok(Json(PageCreatedResponse {
        page_id: body.page_id,
        created: outcome != PageCreation::AlreadyExists,
        outcome,
    }))
}

// JSON carries text: bytes that are not UTF-8 come back replaced, use /raw for exact content
async fn get_page_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
) -> Result<Json<PageContentResponse>, ApiError> {
    let bytes = state.store.read_page(&site_id, &page_id).await?;
    Ok(Json(PageContentResponse {
        content: String::from_utf8_lossy(&bytes).into_owned(),
    }))
}

// exact stored bytes
async fn get_page_raw_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.store.read_page(&site_id, &page_id).await?;
    Ok(([(header::CONTENT_TYPE, "text/html")], bytes))
}

async fn update_page_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
    Json(body): Json<UpdatePageRequest>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    state
        .store
        .update_page_content(&site_id, &page_id, body.content.as_bytes())
        .await?;
    Ok(Json(UpdatedResponse { updated: true }))
}

async fn delete_page_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    state.store.delete_page(&site_id, &page_id).await?;
    Ok(Json(DeletedResponse { deleted: true }))
}

async fn editor_path_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
) -> Result<Json<EditorPathResponse>, ApiError> {
    let location = state.store.editor_path(&site_id, &page_id).await?;
    Ok(Json(EditorPathResponse { location }))
}

async fn list_scripts_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
) -> Result<Json<ScriptListResponse>, ApiError> {
    let scripts = state.store.list_scripts(&site_id, &page_id).await?;
    Ok(Json(ScriptListResponse { scripts }))
}

async fn create_script_handler(
    State(state): State<AppState>,
    Path((site_id, page_id)): Path<(String, String)>,
    Json(body): Json<CreateScriptRequest>,
) -> Result<Json<ScriptCreatedResponse>, ApiError> {
    let script = state
        .store
        .create_script(
            &site_id,
            &page_id,
            body.content.as_bytes(),
            body.name.as_deref(),
        )
        .await?;
    Ok(Json(ScriptCreatedResponse { script }))
}

// served raw so an editor page can load it with a <script src>
async fn get_script_handler(
    State(state): State<AppState>,
    Path((site_id, page_id, name)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let bytes = state.store.read_script(&site_id, &page_id, &name).await?;
    Ok(([(header::CONTENT_TYPE, "application/javascript")], bytes))
}
