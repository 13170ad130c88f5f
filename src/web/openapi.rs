//! OpenAPI document for the REST API.

use utoipa::OpenApi;

use super::dto::{
    AckResponse, CreateFolderRequest, DeleteFolderResponse, FileResponse, FolderResponse,
    FolderSummary, HealthResponse, ParentSummary, RootResponse, UpdateFolderRequest,
    UploadForm,
};
use super::error::{ErrorBody, ErrorCode};
use super::handlers;

/// OpenAPI document for the fileshelf API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "fileshelf API",
        description = "Hierarchical folders and file storage"
    ),
    servers((url = "/api")),
    paths(
        handlers::health::health,
        handlers::folder::create_folder,
        handlers::folder::list_folders,
        handlers::folder::get_folder,
        handlers::folder::update_folder,
        handlers::folder::delete_folder,
        handlers::folder::list_children,
        handlers::folder::get_folder_path,
        handlers::file::upload_file,
        handlers::file::list_files,
        handlers::file::get_file,
        handlers::file::download_file,
        handlers::file::delete_file,
    ),
    components(schemas(
        CreateFolderRequest,
        UpdateFolderRequest,
        UploadForm,
        FolderResponse,
        FolderSummary,
        ParentSummary,
        FileResponse,
        DeleteFolderResponse,
        AckResponse,
        HealthResponse,
        RootResponse,
        ErrorBody,
        ErrorCode,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "folders", description = "Folder tree"),
        (name = "files", description = "File upload, download and metadata")
    )
)]
pub struct ApiDoc;
