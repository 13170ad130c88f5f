//! File management module for fileshelf.
//!
//! This module provides:
//! - Hierarchical folder structure with cascading delete
//! - Folder and file metadata management
//! - Blob storage behind a pluggable backend

mod folder;
mod folder_service;
mod metadata;
mod service;
mod storage;

pub use folder::{Folder, FolderRepository, FolderUpdate, FolderWithParent, NewFolder, ParentRef};
pub use folder_service::{DeleteSummary, FolderService};
pub use metadata::{FileMetadata, FileRepository, NewFile};
pub use service::{DownloadResult, FileService, UploadRequest};
pub use storage::{BlobStore, LocalBlobStore, MemoryBlobStore};

#[cfg(test)]
pub(crate) use storage::testing;

/// Maximum length for folder names (in characters).
pub const MAX_FOLDER_NAME_LENGTH: usize = 255;

/// Maximum length for file names (in characters).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Default maximum file size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
