//! Folder handlers for Web API.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::web::dto::{
    ApiPath, CreateFolderRequest, DeleteFolderResponse, FolderResponse, FolderSummary,
    UpdateFolderRequest, ValidatedJson,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// POST /api/folders - Create a folder.
#[utoipa::path(
    post,
    path = "/folders",
    tag = "folders",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = FolderResponse),
        (status = 400, description = "Invalid name or duplicate sibling", body = ErrorBody),
        (status = 404, description = "Parent folder not found", body = ErrorBody)
    )
)]
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
    let service = state.folder_service();

    let folder = service.create(&req.name, req.parent_id).await?;
    let folder = service.get_by_id(folder.id).await?;

    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// GET /api/folders - List all folders, newest first.
#[utoipa::path(
    get,
    path = "/folders",
    tag = "folders",
    responses(
        (status = 200, description = "List of folders", body = Vec<FolderResponse>),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = state.folder_service().list().await?;

    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}

/// GET /api/folders/:id - Get folder details.
#[utoipa::path(
    get,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder details", body = FolderResponse),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn get_folder(
    State(state): State<Arc<AppState>>,
    ApiPath(folder_id): ApiPath<i64>,
) -> Result<Json<FolderResponse>, ApiError> {
    let folder = state.folder_service().get_by_id(folder_id).await?;

    Ok(Json(folder.into()))
}

/// PUT /api/folders/:id - Rename and/or move a folder.
#[utoipa::path(
    put,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    request_body = UpdateFolderRequest,
    responses(
        (status = 200, description = "Folder updated", body = FolderResponse),
        (status = 400, description = "Invalid name, duplicate sibling or cyclic move", body = ErrorBody),
        (status = 404, description = "Folder or parent not found", body = ErrorBody)
    )
)]
pub async fn update_folder(
    State(state): State<Arc<AppState>>,
    ApiPath(folder_id): ApiPath<i64>,
    ValidatedJson(req): ValidatedJson<UpdateFolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let service = state.folder_service();

    service.update(folder_id, &req.name, req.parent_id).await?;
    let folder = service.get_by_id(folder_id).await?;

    Ok(Json(folder.into()))
}

/// DELETE /api/folders/:id - Delete a folder and everything beneath it.
#[utoipa::path(
    delete,
    path = "/folders/{id}",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Folder subtree deleted", body = DeleteFolderResponse),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    ApiPath(folder_id): ApiPath<i64>,
) -> Result<Json<DeleteFolderResponse>, ApiError> {
    let summary = state.folder_service().delete(folder_id).await?;

    Ok(Json(summary.into()))
}

/// GET /api/folders/:id/children - List direct subfolders.
#[utoipa::path(
    get,
    path = "/folders/{id}/children",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Direct children", body = Vec<FolderSummary>),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn list_children(
    State(state): State<Arc<AppState>>,
    ApiPath(folder_id): ApiPath<i64>,
) -> Result<Json<Vec<FolderSummary>>, ApiError> {
    let children = state.folder_service().children(folder_id).await?;

    Ok(Json(children.into_iter().map(FolderSummary::from).collect()))
}

/// GET /api/folders/:id/path - Breadcrumb from the root down to the folder.
#[utoipa::path(
    get,
    path = "/folders/{id}/path",
    tag = "folders",
    params(
        ("id" = i64, Path, description = "Folder ID")
    ),
    responses(
        (status = 200, description = "Root-to-folder path", body = Vec<FolderSummary>),
        (status = 404, description = "Folder not found", body = ErrorBody)
    )
)]
pub async fn get_folder_path(
    State(state): State<Arc<AppState>>,
    ApiPath(folder_id): ApiPath<i64>,
) -> Result<Json<Vec<FolderSummary>>, ApiError> {
    let path = state.folder_service().path(folder_id).await?;

    Ok(Json(path.into_iter().map(FolderSummary::from).collect()))
}
