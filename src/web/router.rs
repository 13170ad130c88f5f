//! Router configuration for Web API.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    create_folder, delete_file, delete_folder, download_file, get_file, get_folder,
    get_folder_path, health, list_children, list_files, list_folders, root, update_folder,
    upload_file, AppState,
};
use super::middleware::create_cors_layer;
use super::openapi::ApiDoc;

/// Room on top of the upload cap for multipart boundaries and form fields.
const MULTIPART_ENVELOPE: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let folder_routes = Router::new()
        .route("/", get(list_folders).post(create_folder))
        .route(
            "/:id",
            get(get_folder).put(update_folder).delete(delete_folder),
        )
        .route("/:id/children", get(list_children))
        .route("/:id/path", get(get_folder_path));

    let body_limit = usize::try_from(app_state.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_ENVELOPE);

    let file_routes = Router::new()
        .route("/", get(list_files))
        .route(
            "/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/:id", get(get_file).delete(delete_file))
        .route("/:id/download", get(download_file));

    let api_routes = Router::new()
        .route("/health", get(health))
        .nest("/folders", folder_routes)
        .nest("/files", file_routes);

    Router::new()
        .route("/", get(root))
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create the Swagger UI router serving the OpenAPI document.
pub fn create_swagger_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a router serving a built single-page client.
///
/// Unknown paths fall back to `index.html`. Returns `None` if the directory
/// does not exist.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    let dir = Path::new(static_path);
    if !dir.is_dir() {
        tracing::warn!("Static path {} does not exist; not serving client", static_path);
        return None;
    }

    let index = dir.join("index.html");
    let serve_dir = ServeDir::new(dir).not_found_service(ServeFile::new(index));

    Some(Router::new().fallback_service(serve_dir))
}
