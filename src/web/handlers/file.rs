//! File handlers for Web API.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use bytes::Bytes;
use std::sync::Arc;

use crate::file::UploadRequest;
use crate::web::dto::validation::sanitize_filename;
use crate::web::dto::{AckResponse, ApiPath, ApiQuery, FileListQuery, FileResponse, UploadForm};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters (CR/LF included) are dropped, quotes and backslashes
/// replaced, and non-ASCII names additionally sent as an RFC 5987
/// `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Parse the optional `folderId` multipart field.
///
/// Empty and `null` values mean unfiled.
fn parse_folder_id(raw: &str) -> Result<Option<i64>, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| ApiError::validation_message(format!("invalid folderId '{raw}'")))
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::validation_message("file is too large")
    } else {
        tracing::error!("Failed to read multipart data: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// POST /api/files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" part and an optional
/// "folderId" field.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    request_body(
        content = UploadForm,
        content_type = "multipart/form-data",
        description = "`file` part plus optional `folderId`"
    ),
    responses(
        (status = 201, description = "File uploaded", body = FileResponse),
        (status = 400, description = "No file, empty file or file too large", body = ErrorBody),
        (status = 404, description = "Folder not found", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileResponse>), ApiError> {
    let mut filename: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut content: Option<Bytes> = None;
    let mut folder_id: Option<i64> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(sanitize_filename);
                mime_type = field.content_type().map(|s| s.to_string());
                content = Some(field.bytes().await.map_err(multipart_error)?);
            }
            "folderId" => {
                let raw = field.text().await.map_err(multipart_error)?;
                folder_id = parse_folder_id(&raw)?;
            }
            _ => {}
        }
    }

    let content = content.ok_or_else(|| ApiError::validation_message("No file uploaded"))?;
    let filename = filename.ok_or_else(|| ApiError::validation_message("No file uploaded"))?;

    let mut request = UploadRequest::new(filename, content).with_folder(folder_id);
    if let Some(mime_type) = mime_type {
        request = request.with_mime_type(mime_type);
    }

    let file = state.file_service().upload(&request).await?;

    Ok((StatusCode::CREATED, Json(file.into())))
}

/// GET /api/files - List files, optionally filtered by folder.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(FileListQuery),
    responses(
        (status = 200, description = "List of files, newest first", body = Vec<FileResponse>),
        (status = 500, description = "Internal error", body = ErrorBody)
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<FileListQuery>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = state.file_service().list(query.folder_id).await?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET /api/files/:id - Get file metadata.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    ApiPath(file_id): ApiPath<i64>,
) -> Result<Json<FileResponse>, ApiError> {
    let file = state.file_service().get(file_id).await?;

    Ok(Json(file.into()))
}

/// GET /api/files/:id/download - Download a file.
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorBody)
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    ApiPath(file_id): ApiPath<i64>,
) -> Result<Response<Body>, ApiError> {
    let download = state.file_service().download(file_id).await?;
    let file = download.metadata;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, file.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.name),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/files/:id - Delete a file.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = AckResponse),
        (status = 404, description = "File not found", body = ErrorBody),
        (status = 500, description = "Blob could not be removed; file kept", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    ApiPath(file_id): ApiPath<i64>,
) -> Result<Json<AckResponse>, ApiError> {
    state.file_service().delete(file_id).await?;

    Ok(Json(AckResponse::new("File deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::error::ErrorCode;

    #[test]
    fn test_content_disposition_ascii() {
        let header = content_disposition_header("report.pdf");
        assert_eq!(header, "attachment; filename=\"report.pdf\"");
    }

    #[test]
    fn test_content_disposition_with_spaces() {
        let header = content_disposition_header("my report 2024.pdf");
        assert_eq!(header, "attachment; filename=\"my report 2024.pdf\"");
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let header = content_disposition_header("résumé.pdf");
        assert!(header.starts_with("attachment; filename=\"résumé.pdf\""));
        assert!(header.contains("filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"));
    }

    #[test]
    fn test_content_disposition_header_injection() {
        let header = content_disposition_header("evil\r\nX-Injected: true.txt");
        assert!(!header.contains('\r'));
        assert!(!header.contains('\n'));
        assert!(header.contains("filename*=UTF-8''"));
    }

    #[test]
    fn test_content_disposition_quotes() {
        let header = content_disposition_header("say \"hi\".txt");
        assert!(header.contains("filename=\"say _hi_.txt\""));
    }

    #[test]
    fn test_parse_folder_id() {
        assert_eq!(parse_folder_id("12").unwrap(), Some(12));
        assert_eq!(parse_folder_id(" 7 ").unwrap(), Some(7));
        assert_eq!(parse_folder_id("").unwrap(), None);
        assert_eq!(parse_folder_id("null").unwrap(), None);

        let err = parse_folder_id("abc").unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }
}
