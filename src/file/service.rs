//! File service for fileshelf.
//!
//! This module provides high-level file operations including:
//! - Upload with size checks and blob/metadata compensation
//! - Download and metadata lookup
//! - File listing and deletion

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::{Result, ShelfError};

use super::folder::FolderRepository;
use super::metadata::{FileMetadata, FileRepository, NewFile};
use super::storage::BlobStore;
use super::{DEFAULT_MAX_FILE_SIZE, MAX_FILENAME_LENGTH};

/// Request data for file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Folder ID to upload to (None for unfiled).
    pub folder_id: Option<i64>,
    /// Original filename.
    pub filename: String,
    /// MIME type reported by the client.
    pub mime_type: Option<String>,
    /// File content.
    pub content: Bytes,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            folder_id: None,
            filename: filename.into(),
            mime_type: None,
            content: content.into(),
        }
    }

    /// Set the target folder.
    pub fn with_folder(mut self, folder_id: Option<i64>) -> Self {
        self.folder_id = folder_id;
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// The MIME type to record: the client's value if usable, otherwise a
    /// guess from the filename.
    fn resolved_mime_type(&self) -> String {
        self.mime_type
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&self.filename)
                    .first_or_octet_stream()
                    .to_string()
            })
    }
}

/// Result of a file download.
#[derive(Debug)]
pub struct DownloadResult {
    /// File metadata.
    pub metadata: FileMetadata,
    /// File content.
    pub content: Bytes,
}

/// File service for managing file uploads and downloads.
pub struct FileService<'a> {
    db: &'a Database,
    storage: &'a dyn BlobStore,
    max_file_size: u64,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, storage: &'a dyn BlobStore) -> Self {
        Self {
            db,
            storage,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a new FileService with a custom max file size.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Upload a file.
    ///
    /// The blob is written first. If the metadata insert then fails, the
    /// blob is removed again before the error is returned.
    ///
    /// # Errors
    /// - `Validation` for empty content, a blank or over-long filename, or
    ///   content larger than the configured maximum
    /// - `NotFound` if `folder_id` names a missing folder
    /// - `Storage` if the blob store rejects the write
    pub async fn upload(&self, request: &UploadRequest) -> Result<FileMetadata> {
        if request.content.is_empty() {
            return Err(ShelfError::Validation("no file content uploaded".to_string()));
        }

        let filename = request.filename.trim();
        if filename.is_empty() {
            return Err(ShelfError::Validation("file name is required".to_string()));
        }
        if filename.chars().count() > MAX_FILENAME_LENGTH {
            return Err(ShelfError::Validation(format!(
                "file name must be at most {MAX_FILENAME_LENGTH} characters"
            )));
        }

        if request.content.len() as u64 > self.max_file_size {
            return Err(ShelfError::Validation(format!(
                "file is too large (max {})",
                format_size(self.max_file_size)
            )));
        }

        if let Some(folder_id) = request.folder_id {
            FolderRepository::new(self.db.pool())
                .get_by_id(folder_id)
                .await?
                .ok_or_else(|| ShelfError::NotFound("folder".to_string()))?;
        }

        let blob_path = self.storage.put(request.content.clone(), filename).await?;

        let new_file = NewFile::new(
            filename,
            request.resolved_mime_type(),
            request.content.len() as i64,
            &blob_path,
        )
        .with_folder(request.folder_id);

        let metadata = match FileRepository::new(self.db.pool()).create(&new_file).await {
            Ok(metadata) => metadata,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&blob_path).await {
                    warn!(
                        blob = %blob_path,
                        error = %cleanup,
                        "Failed to remove blob after metadata insert failed"
                    );
                }
                return Err(e);
            }
        };

        info!(
            file_id = metadata.id,
            folder_id = ?metadata.folder_id,
            size = metadata.size_bytes,
            backend = self.storage.backend_name(),
            "File uploaded"
        );
        Ok(metadata)
    }

    /// List files, optionally only those in one folder. Newest first.
    pub async fn list(&self, folder_id: Option<i64>) -> Result<Vec<FileMetadata>> {
        let repo = FileRepository::new(self.db.pool());
        match folder_id {
            Some(id) => repo.list_by_folder(id).await,
            None => repo.list_all().await,
        }
    }

    /// Get file metadata without downloading content.
    pub async fn get(&self, file_id: i64) -> Result<FileMetadata> {
        FileRepository::new(self.db.pool())
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("file".to_string()))
    }

    /// Download a file.
    ///
    /// # Returns
    /// The file metadata and content.
    pub async fn download(&self, file_id: i64) -> Result<DownloadResult> {
        let metadata = self.get(file_id).await?;
        let content = self.storage.get(&metadata.blob_path).await?;

        Ok(DownloadResult { metadata, content })
    }

    /// Delete a file.
    ///
    /// The blob goes first; if the store fails, the record is kept and the
    /// storage error returned. A blob already missing from the store does not
    /// block the delete.
    pub async fn delete(&self, file_id: i64) -> Result<()> {
        let metadata = self.get(file_id).await?;

        if !self.storage.delete(&metadata.blob_path).await? {
            debug!(file_id, blob = %metadata.blob_path, "Blob already missing");
        }

        FileRepository::new(self.db.pool()).delete(file_id).await?;

        info!(file_id, "File deleted");
        Ok(())
    }
}

fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else {
        format!("{bytes} bytes")
    }
}
