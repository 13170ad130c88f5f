//! API handlers for the fileshelf REST API.

pub mod file;
pub mod folder;
pub mod health;

pub use file::*;
pub use folder::*;
pub use health::*;

use std::sync::Arc;

use crate::db::Database;
use crate::file::{BlobStore, FileService, FolderService, DEFAULT_MAX_FILE_SIZE};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Blob store for file contents.
    pub storage: Arc<dyn BlobStore>,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state with the default upload limit.
    pub fn new(db: Database, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            db,
            storage,
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the maximum upload size.
    pub fn with_max_upload_size(mut self, max_upload_size: u64) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    pub(crate) fn folder_service(&self) -> FolderService<'_> {
        FolderService::new(&self.db, self.storage.as_ref())
    }

    pub(crate) fn file_service(&self) -> FileService<'_> {
        FileService::new(&self.db, self.storage.as_ref()).with_max_file_size(self.max_upload_size)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("storage", &self.storage.backend_name())
            .field("max_upload_size", &self.max_upload_size)
            .finish()
    }
}
