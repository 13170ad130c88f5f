//! Response DTOs for Web API.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{DeleteSummary, FileMetadata, Folder, FolderWithParent, ParentRef};

/// Folder parent as shown in responses.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ParentSummary {
    pub id: i64,
    pub name: String,
}

impl From<ParentRef> for ParentSummary {
    fn from(parent: ParentRef) -> Self {
        Self {
            id: parent.id,
            name: parent.name,
        }
    }
}

/// Folder response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderResponse {
    /// Folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Raw parent reference.
    pub parent_id: Option<i64>,
    /// Resolved parent; null for root folders.
    pub parent: Option<ParentSummary>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<FolderWithParent> for FolderResponse {
    fn from(f: FolderWithParent) -> Self {
        Self {
            id: f.folder.id,
            name: f.folder.name,
            parent_id: f.folder.parent_id,
            parent: f.parent.map(ParentSummary::from),
            created_at: f.folder.created_at,
            updated_at: f.folder.updated_at,
        }
    }
}

/// Folder breadcrumb entry.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FolderSummary {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl From<Folder> for FolderSummary {
    fn from(f: Folder) -> Self {
        Self {
            id: f.id,
            name: f.name,
            parent_id: f.parent_id,
        }
    }
}

/// File metadata response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub id: i64,
    /// Original filename.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size_bytes: i64,
    /// Containing folder; null for unfiled.
    pub folder_id: Option<i64>,
    /// Relative URL serving the content.
    pub download_url: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<FileMetadata> for FileResponse {
    fn from(f: FileMetadata) -> Self {
        Self {
            download_url: format!("/api/files/{}/download", f.id),
            id: f.id,
            name: f.name,
            mime_type: f.mime_type,
            size_bytes: f.size_bytes,
            folder_id: f.folder_id,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Response of `DELETE /api/folders/:id`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFolderResponse {
    pub message: String,
    /// Folders removed, the target included.
    pub folders_deleted: u64,
    /// Files removed from the subtree.
    pub files_deleted: u64,
    /// Blobs left behind because the store refused to delete them.
    pub blob_failures: u64,
}

impl From<DeleteSummary> for DeleteFolderResponse {
    fn from(s: DeleteSummary) -> Self {
        Self {
            message: "Folder deleted successfully".to_string(),
            folders_deleted: s.folders_deleted,
            files_deleted: s.files_deleted,
            blob_failures: s.blob_failures,
        }
    }
}

/// Plain acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `OK` or `ERROR`.
    pub status: String,
    pub message: String,
}

/// Service banner served at `/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    /// Endpoint group name to path.
    pub endpoints: BTreeMap<String, String>,
}
