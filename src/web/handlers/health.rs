//! Health and banner handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::web::dto::{HealthResponse, RootResponse};
use crate::web::handlers::AppState;

/// GET /api/health - Check the server and its database.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server and database are up", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "OK".to_string(),
                message: "Server is running".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "ERROR".to_string(),
                    message: "Database is unreachable".to_string(),
                }),
            )
        }
    }
}

/// GET / - Service banner and endpoint map.
pub async fn root() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("health".to_string(), "/api/health".to_string()),
        ("folders".to_string(), "/api/folders".to_string()),
        ("files".to_string(), "/api/files".to_string()),
        ("upload".to_string(), "/api/files/upload".to_string()),
        ("docs".to_string(), "/swagger-ui".to_string()),
    ]);

    Json(RootResponse {
        message: "fileshelf API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints,
    })
}
