//! Folder service for fileshelf.
//!
//! This module provides high-level folder operations including:
//! - Create/rename/move with sibling-name and cycle checks
//! - Listing with resolved parents
//! - Cascading delete of a whole subtree and the files it contains

use std::collections::{HashSet, VecDeque};

use tracing::{debug, info, warn};

use crate::db::Database;
use crate::{Result, ShelfError};

use super::folder::{Folder, FolderRepository, FolderUpdate, FolderWithParent, NewFolder};
use super::metadata::FileRepository;
use super::storage::BlobStore;
use super::MAX_FOLDER_NAME_LENGTH;

/// Outcome of a cascading folder delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    /// Folder records removed, the target included.
    pub folders_deleted: u64,
    /// File records removed.
    pub files_deleted: u64,
    /// Blobs that could not be removed from storage.
    pub blob_failures: u64,
}

/// Folder service for managing the folder tree.
pub struct FolderService<'a> {
    db: &'a Database,
    storage: &'a dyn BlobStore,
}

impl<'a> FolderService<'a> {
    /// Create a new FolderService.
    pub fn new(db: &'a Database, storage: &'a dyn BlobStore) -> Self {
        Self { db, storage }
    }

    fn folders(&self) -> FolderRepository<'_> {
        FolderRepository::new(self.db.pool())
    }

    /// Create a folder.
    ///
    /// # Errors
    /// - `Validation` if the name is blank or too long
    /// - `NotFound` if `parent_id` names a missing folder
    /// - `Conflict` if a sibling with the same name exists
    pub async fn create(&self, name: &str, parent_id: Option<i64>) -> Result<Folder> {
        let name = validate_name(name)?;
        let repo = self.folders();

        if let Some(pid) = parent_id {
            self.require_parent(pid).await?;
        }

        if repo.find_sibling(&name, parent_id, None).await?.is_some() {
            return Err(ShelfError::Conflict(format!(
                "a folder named '{name}' already exists here"
            )));
        }

        let folder = repo
            .create(&NewFolder::new(name).with_parent(parent_id))
            .await?;

        info!(folder_id = folder.id, parent_id = ?folder.parent_id, "Folder created");
        Ok(folder)
    }

    /// List every folder with its parent resolved, newest first.
    pub async fn list(&self) -> Result<Vec<FolderWithParent>> {
        self.folders().list_with_parent().await
    }

    /// Get a folder with its parent resolved.
    pub async fn get_by_id(&self, id: i64) -> Result<FolderWithParent> {
        self.folders()
            .get_with_parent(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("folder".to_string()))
    }

    /// Rename and/or move a folder.
    ///
    /// `parent_id = None` moves the folder to the root.
    ///
    /// # Errors
    /// - `Validation` if the name is blank, or the new parent is the folder
    ///   itself or one of its descendants
    /// - `NotFound` if the folder or the new parent is missing
    /// - `Conflict` if another sibling already uses the name
    pub async fn update(&self, id: i64, name: &str, parent_id: Option<i64>) -> Result<Folder> {
        let name = validate_name(name)?;
        let repo = self.folders();

        if repo.get_by_id(id).await?.is_none() {
            return Err(ShelfError::NotFound("folder".to_string()));
        }

        if let Some(pid) = parent_id {
            if pid == id {
                return Err(ShelfError::Validation(
                    "a folder cannot be its own parent".to_string(),
                ));
            }
            self.require_parent(pid).await?;

            let ancestors = repo.get_path(pid).await?;
            if ancestors.iter().any(|f| f.id == id) {
                return Err(ShelfError::Validation(
                    "cannot move a folder into one of its own subfolders".to_string(),
                ));
            }
        }

        if repo.find_sibling(&name, parent_id, Some(id)).await?.is_some() {
            return Err(ShelfError::Conflict(format!(
                "a folder named '{name}' already exists here"
            )));
        }

        let update = FolderUpdate::new().name(name).parent_id(parent_id);
        let folder = repo
            .update(id, &update)
            .await?
            .ok_or_else(|| ShelfError::NotFound("folder".to_string()))?;

        info!(folder_id = id, parent_id = ?folder.parent_id, "Folder updated");
        Ok(folder)
    }

    /// Delete a folder, every folder beneath it and all the files they hold.
    ///
    /// Descendants go first and the target last. A blob that fails to delete
    /// is logged and counted, and its file record is removed anyway. The
    /// cascade is not atomic: a database error stops it with the work done so
    /// far already committed.
    pub async fn delete(&self, id: i64) -> Result<DeleteSummary> {
        let repo = self.folders();

        if repo.get_by_id(id).await?.is_none() {
            return Err(ShelfError::NotFound("folder".to_string()));
        }

        let subtree = self.collect_subtree(id).await?;
        debug!(folder_id = id, folders = subtree.len(), "Collected subtree for delete");

        let mut summary = DeleteSummary::default();

        // Breadth-first order reversed puts every folder after its descendants.
        for folder_id in subtree.iter().rev().copied() {
            self.delete_files_in(folder_id, &mut summary).await?;

            if repo.delete(folder_id).await? {
                summary.folders_deleted += 1;
            }
        }

        info!(
            folder_id = id,
            folders_deleted = summary.folders_deleted,
            files_deleted = summary.files_deleted,
            blob_failures = summary.blob_failures,
            "Folder deleted"
        );
        Ok(summary)
    }

    /// Direct children of a folder.
    pub async fn children(&self, id: i64) -> Result<Vec<Folder>> {
        let repo = self.folders();
        if repo.get_by_id(id).await?.is_none() {
            return Err(ShelfError::NotFound("folder".to_string()));
        }
        repo.list_by_parent(id).await
    }

    /// Folders from the root down to `id`, inclusive.
    pub async fn path(&self, id: i64) -> Result<Vec<Folder>> {
        let path = self.folders().get_path(id).await?;
        if path.is_empty() {
            return Err(ShelfError::NotFound("folder".to_string()));
        }
        Ok(path)
    }

    async fn require_parent(&self, parent_id: i64) -> Result<Folder> {
        self.folders()
            .get_by_id(parent_id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("parent folder".to_string()))
    }

    /// Walk the subtree rooted at `root` breadth-first.
    ///
    /// The visited set stops a corrupted `parent_id` loop from being walked
    /// forever.
    async fn collect_subtree(&self, root: i64) -> Result<Vec<i64>> {
        let repo = self.folders();
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([root]);

        while let Some(folder_id) = queue.pop_front() {
            if !visited.insert(folder_id) {
                warn!(folder_id, "Folder reached twice while walking subtree, skipping");
                continue;
            }
            order.push(folder_id);

            for child in repo.list_by_parent(folder_id).await? {
                queue.push_back(child.id);
            }
        }

        Ok(order)
    }

    async fn delete_files_in(&self, folder_id: i64, summary: &mut DeleteSummary) -> Result<()> {
        let files = FileRepository::new(self.db.pool());

        for file in files.list_by_folder(folder_id).await? {
            if let Err(e) = self.storage.delete(&file.blob_path).await {
                warn!(
                    file_id = file.id,
                    blob = %file.blob_path,
                    error = %e,
                    "Failed to delete blob, removing metadata anyway"
                );
                summary.blob_failures += 1;
            }

            if files.delete(file.id).await? {
                summary.files_deleted += 1;
            }
        }

        Ok(())
    }
}

/// Trim and check a folder name.
fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ShelfError::Validation("folder name is required".to_string()));
    }

    if name.chars().count() > MAX_FOLDER_NAME_LENGTH {
        return Err(ShelfError::Validation(format!(
            "folder name must be at most {MAX_FOLDER_NAME_LENGTH} characters"
        )));
    }

    Ok(name.to_string())
}
