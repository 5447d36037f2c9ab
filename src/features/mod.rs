pub mod sites;

use crate::AppState;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

/// Local frontend dev servers allowed to call the API from a browser.
pub const ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:4321",
    "http://localhost:5173",
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:4321",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

fn cors_layer() -> CorsLayer {
    let origins = ALLOWED_ORIGINS
        .iter()
        .copied()
        .map(HeaderValue::from_static);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Full application router: the JSON API under `/api/v1` and the raw sites
/// tree under `/sites` so editor pages load in a browser.
pub fn app_router(state: AppState) -> Router {
    let api_router = sites::sites_router();
    let sites_dir = state.store.paths().root().to_path_buf();

    Router::new()
        .nest("/api/v1", api_router)
        .nest_service("/sites", ServeDir::new(sites_dir))
        .layer(cors_layer())
        .with_state(state)
}
