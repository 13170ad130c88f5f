//! Blob storage for fileshelf.
//!
//! File contents live outside the database behind the [`BlobStore`] trait.
//! The database only keeps the opaque locator returned by [`BlobStore::put`].
//!
//! Two backends are provided:
//! - [`LocalBlobStore`]: UUID-named files in a sharded directory on disk
//! - [`MemoryBlobStore`]: a process-local map, used by tests and the
//!   ephemeral `memory` backend

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::{Result, ShelfError};

/// Pluggable store for file contents.
///
/// `put` returns the locator to persist; `get` and `delete` take it back.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Store `content` and return its locator.
    async fn put(&self, content: Bytes, original_name: &str) -> Result<String>;

    /// Read the content behind a locator.
    ///
    /// Returns `ShelfError::NotFound` if the blob is missing.
    async fn get(&self, blob_path: &str) -> Result<Bytes>;

    /// Remove a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it didn't exist.
    async fn delete(&self, blob_path: &str) -> Result<bool>;
}

/// Generate a new UUID-based stored name keeping the original extension.
fn generate_stored_name(original_name: &str) -> String {
    let uuid = Uuid::new_v4();
    let ext = extract_extension(original_name);
    format!("{uuid}.{ext}")
}

/// Longest extension carried over into a stored name.
const MAX_EXTENSION_LENGTH: usize = 16;

/// Extract the file extension from a filename.
///
/// Returns "bin" if there is no extension, or if it is too long or holds
/// anything other than ASCII letters and digits.
fn extract_extension(filename: &str) -> &str {
    Path::new(filename)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LENGTH
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or("bin")
}

/// Disk-backed blob store.
///
/// Files are stored in a sharded directory structure:
/// ```text
/// {base_path}/
/// ├── ab/
/// │   └── ab12cd34-5678-90ab-cdef-123456789012.txt
/// ├── cd/
/// │   └── cd90ab12-3456-7890-abcd-ef1234567890.bin
/// └── ...
/// ```
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    base_path: PathBuf,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full file path for a stored name.
    ///
    /// The path is constructed as: {base_path}/{shard}/{stored_name}
    /// where shard is the first 2 characters of the stored name (UUID prefix).
    /// Names that could escape the base directory are rejected.
    pub fn get_file_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains(|c: char| c == '/' || c == '\\')
            || stored_name.starts_with('.')
        {
            return Err(ShelfError::Storage(format!(
                "invalid blob path '{stored_name}'"
            )));
        }

        let shard = Self::get_shard(stored_name);
        Ok(self.base_path.join(shard).join(stored_name))
    }

    fn get_shard(stored_name: &str) -> &str {
        stored_name.get(..2).unwrap_or(stored_name)
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, content: Bytes, original_name: &str) -> Result<String> {
        let stored_name = generate_stored_name(original_name);
        let file_path = self.get_file_path(&stored_name)?;

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ShelfError::Storage(format!("create shard directory: {e}")))?;
        }

        tokio::fs::write(&file_path, &content)
            .await
            .map_err(|e| ShelfError::Storage(format!("write {stored_name}: {e}")))?;

        debug!(blob = %stored_name, size = content.len(), "Stored blob on disk");
        Ok(stored_name)
    }

    async fn get(&self, blob_path: &str) -> Result<Bytes> {
        let file_path = self.get_file_path(blob_path)?;

        match tokio::fs::read(&file_path).await {
            Ok(content) => Ok(Bytes::from(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(format!("blob {blob_path}")))
            }
            Err(e) => Err(ShelfError::Storage(format!("read {blob_path}: {e}"))),
        }
    }

    async fn delete(&self, blob_path: &str) -> Result<bool> {
        let file_path = self.get_file_path(blob_path)?;

        match tokio::fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ShelfError::Storage(format!("delete {blob_path}: {e}"))),
        }
    }
}

/// In-memory blob store.
///
/// Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently held.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// Whether a blob exists under the given locator.
    pub async fn contains(&self, blob_path: &str) -> bool {
        self.blobs.read().await.contains_key(blob_path)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, content: Bytes, original_name: &str) -> Result<String> {
        let stored_name = generate_stored_name(original_name);
        self.blobs.write().await.insert(stored_name.clone(), content);
        Ok(stored_name)
    }

    async fn get(&self, blob_path: &str) -> Result<Bytes> {
        self.blobs
            .read()
            .await
            .get(blob_path)
            .cloned()
            .ok_or_else(|| ShelfError::NotFound(format!("blob {blob_path}")))
    }

    async fn delete(&self, blob_path: &str) -> Result<bool> {
        Ok(self.blobs.write().await.remove(blob_path).is_some())
    }
}
