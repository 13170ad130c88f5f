//! Folder types and repository for fileshelf.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, SqlitePool};

use crate::{Result, ShelfError};

const FOLDER_COLUMNS: &str = "id, name, parent_id, created_at, updated_at";

/// A folder in the tree.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Folder {
    /// Unique folder ID.
    pub id: i64,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<i64>,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Resolved reference to a folder's parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ParentRef {
    pub id: i64,
    pub name: String,
}

/// A folder together with its resolved parent.
///
/// `parent` is `None` for root folders and for folders whose parent row has
/// gone missing; `folder.parent_id` keeps the raw reference either way.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderWithParent {
    pub folder: Folder,
    pub parent: Option<ParentRef>,
}

#[derive(sqlx::FromRow)]
struct FolderParentRow {
    #[sqlx(flatten)]
    folder: Folder,
    parent_name: Option<String>,
}

impl From<FolderParentRow> for FolderWithParent {
    fn from(row: FolderParentRow) -> Self {
        let parent = row
            .folder
            .parent_id
            .zip(row.parent_name)
            .map(|(id, name)| ParentRef { id, name });
        Self {
            folder: row.folder,
            parent,
        }
    }
}

/// Data for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder ID (None for root folders).
    pub parent_id: Option<i64>,
}

impl NewFolder {
    /// Create a new root-level NewFolder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_id: None,
        }
    }

    /// Set the parent folder (`None` for the root level).
    pub fn with_parent(mut self, parent_id: Option<i64>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// Builder for updating a folder.
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    /// New folder name.
    pub name: Option<String>,
    /// New parent folder ID (`Some(None)` moves the folder to the root).
    pub parent_id: Option<Option<i64>>,
}

impl FolderUpdate {
    /// Create a new FolderUpdate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the parent folder ID.
    pub fn parent_id(mut self, parent_id: Option<i64>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.parent_id.is_none()
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderRepository<'a> {
    /// Create a new FolderRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new folder.
    ///
    /// A sibling with the same name yields `ShelfError::Conflict`.
    pub async fn create(&self, folder: &NewFolder) -> Result<Folder> {
        let result = sqlx::query("INSERT INTO folders (name, parent_id) VALUES (?, ?)")
            .bind(&folder.name)
            .bind(folder.parent_id)
            .execute(self.pool)
            .await
            .map_err(|e| map_name_conflict(e, &folder.name))?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("folder".to_string()))
    }

    /// Get a folder by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(folder)
    }

    /// Get a folder by ID with its parent resolved.
    pub async fn get_with_parent(&self, id: i64) -> Result<Option<FolderWithParent>> {
        let row = sqlx::query_as::<_, FolderParentRow>(
            "SELECT f.id, f.name, f.parent_id, f.created_at, f.updated_at, p.name AS parent_name
             FROM folders f LEFT JOIN folders p ON p.id = f.parent_id
             WHERE f.id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(FolderWithParent::from))
    }

    /// List every folder with its parent resolved, newest first.
    pub async fn list_with_parent(&self) -> Result<Vec<FolderWithParent>> {
        let rows = sqlx::query_as::<_, FolderParentRow>(
            "SELECT f.id, f.name, f.parent_id, f.created_at, f.updated_at, p.name AS parent_name
             FROM folders f LEFT JOIN folders p ON p.id = f.parent_id
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(FolderWithParent::from).collect())
    }

    /// List child folders of a parent folder.
    pub async fn list_by_parent(&self, parent_id: i64) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE parent_id = ? ORDER BY name, id"
        ))
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;

        Ok(folders)
    }

    /// Find a folder by name among the children of `parent_id`.
    ///
    /// `parent_id = None` searches the root level. `exclude_id` skips one
    /// folder, so a rename can be checked against its siblings only.
    pub async fn find_sibling(
        &self,
        name: &str,
        parent_id: Option<i64>,
        exclude_id: Option<i64>,
    ) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders
             WHERE name = ? AND parent_id IS ? AND id IS NOT ?
             LIMIT 1"
        ))
        .bind(name)
        .bind(parent_id)
        .bind(exclude_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(folder)
    }

    /// Update a folder.
    ///
    /// Returns `None` if the folder does not exist.
    pub async fn update(&self, id: i64, update: &FolderUpdate) -> Result<Option<Folder>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE folders SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name);
        }

        if let Some(parent_id) = update.parent_id {
            separated.push("parent_id = ");
            separated.push_bind_unseparated(parent_id);
        }

        separated.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await.map_err(|e| {
            map_name_conflict(e, update.name.as_deref().unwrap_or("folder"))
        })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a folder by ID.
    ///
    /// Only the row itself is removed; see `FolderService::delete` for the
    /// cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM folders WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the path from root to a folder.
    ///
    /// Stops at a missing parent, or when a corrupted parent chain loops back
    /// onto a folder already on the path.
    pub async fn get_path(&self, id: i64) -> Result<Vec<Folder>> {
        let mut path: Vec<Folder> = Vec::new();
        let mut current_id = Some(id);

        while let Some(folder_id) = current_id {
            if path.iter().any(|f| f.id == folder_id) {
                break;
            }
            if let Some(folder) = self.get_by_id(folder_id).await? {
                current_id = folder.parent_id;
                path.push(folder);
            } else {
                break;
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Count all folders.
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM folders")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}

fn map_name_conflict(e: sqlx::Error, name: &str) -> ShelfError {
    if ShelfError::is_unique_violation(&e) {
        ShelfError::Conflict(format!("a folder named '{name}' already exists here"))
    } else {
        ShelfError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_folder() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let folder = repo.create(&NewFolder::new("Docs")).await.unwrap();

        assert_eq!(folder.name, "Docs");
        assert!(folder.parent_id.is_none());
        assert_eq!(folder.created_at, folder.updated_at);
    }

    #[tokio::test]
    async fn test_get_folder_by_id() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let created = repo.create(&NewFolder::new("Test Folder")).await.unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_get_folder_not_found() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let found = repo.get_by_id(9999).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_sibling_conflicts() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let docs = repo.create(&NewFolder::new("Docs")).await.unwrap();
        let result = repo.create(&NewFolder::new("Docs")).await;
        assert!(matches!(result, Err(ShelfError::Conflict(_))));

        // Same name under another parent is allowed
        let nested = repo
            .create(&NewFolder::new("Docs").with_parent(Some(docs.id)))
            .await
            .unwrap();
        assert_eq!(nested.parent_id, Some(docs.id));
    }

    #[tokio::test]
    async fn test_list_children_by_name() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let photos = repo.create(&NewFolder::new("Photos")).await.unwrap();
        repo.create(&NewFolder::new("Archive")).await.unwrap();
        repo.create(&NewFolder::new("2024").with_parent(Some(photos.id)))
            .await
            .unwrap();
        repo.create(&NewFolder::new("2023").with_parent(Some(photos.id)))
            .await
            .unwrap();

        let children = repo.list_by_parent(photos.id).await.unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "2023");
        assert_eq!(children[1].name, "2024");
    }

    #[tokio::test]
    async fn test_list_with_parent_newest_first() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let docs = repo.create(&NewFolder::new("Docs")).await.unwrap();
        let year = repo
            .create(&NewFolder::new("2024").with_parent(Some(docs.id)))
            .await
            .unwrap();

        let folders = repo.list_with_parent().await.unwrap();
        assert_eq!(folders.len(), 2);

        assert_eq!(folders[0].folder.id, year.id);
        assert_eq!(
            folders[0].parent,
            Some(ParentRef {
                id: docs.id,
                name: "Docs".to_string()
            })
        );
        assert_eq!(folders[1].folder.id, docs.id);
        assert!(folders[1].parent.is_none());
    }

    #[tokio::test]
    async fn test_get_with_parent_orphan() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let orphan = repo
            .create(&NewFolder::new("Orphan").with_parent(Some(4242)))
            .await
            .unwrap();

        let found = repo.get_with_parent(orphan.id).await.unwrap().unwrap();
        assert_eq!(found.folder.parent_id, Some(4242));
        assert!(found.parent.is_none());

        assert!(repo.get_with_parent(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_sibling() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let docs = repo.create(&NewFolder::new("Docs")).await.unwrap();
        let inner = repo
            .create(&NewFolder::new("Inner").with_parent(Some(docs.id)))
            .await
            .unwrap();

        let found = repo.find_sibling("Docs", None, None).await.unwrap();
        assert_eq!(found.map(|f| f.id), Some(docs.id));

        // Excluding itself hides the match
        let found = repo.find_sibling("Docs", None, Some(docs.id)).await.unwrap();
        assert!(found.is_none());

        let found = repo
            .find_sibling("Inner", Some(docs.id), None)
            .await
            .unwrap();
        assert_eq!(found.map(|f| f.id), Some(inner.id));

        // Not at the root
        assert!(repo.find_sibling("Inner", None, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_folder() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let a = repo.create(&NewFolder::new("A")).await.unwrap();
        let b = repo.create(&NewFolder::new("B")).await.unwrap();

        let update = FolderUpdate::new().name("Renamed").parent_id(Some(a.id));
        let updated = repo.update(b.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.parent_id, Some(a.id));
        assert!(updated.updated_at >= b.updated_at);

        // Move back to root
        let update = FolderUpdate::new().parent_id(None);
        let updated = repo.update(b.id, &update).await.unwrap().unwrap();
        assert!(updated.parent_id.is_none());
    }

    #[tokio::test]
    async fn test_update_empty_returns_current() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let folder = repo.create(&NewFolder::new("Same")).await.unwrap();
        let result = repo.update(folder.id, &FolderUpdate::new()).await.unwrap();
        assert_eq!(result, Some(folder));
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let result = repo
            .update(9999, &FolderUpdate::new().name("Nope"))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_rename_conflict() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        repo.create(&NewFolder::new("Taken")).await.unwrap();
        let other = repo.create(&NewFolder::new("Other")).await.unwrap();

        let result = repo
            .update(other.id, &FolderUpdate::new().name("Taken"))
            .await;
        assert!(matches!(result, Err(ShelfError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_folder() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let folder = repo.create(&NewFolder::new("To Delete")).await.unwrap();

        assert!(repo.delete(folder.id).await.unwrap());
        assert!(repo.get_by_id(folder.id).await.unwrap().is_none());
        assert!(!repo.delete(folder.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_get_path() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let level0 = repo.create(&NewFolder::new("Root")).await.unwrap();
        let level1 = repo
            .create(&NewFolder::new("Level1").with_parent(Some(level0.id)))
            .await
            .unwrap();
        let level2 = repo
            .create(&NewFolder::new("Level2").with_parent(Some(level1.id)))
            .await
            .unwrap();

        let path = repo.get_path(level2.id).await.unwrap();
        let names: Vec<_> = path.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Root", "Level1", "Level2"]);

        assert!(repo.get_path(9999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_path_stops_on_cycle() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        let a = repo.create(&NewFolder::new("A")).await.unwrap();
        let b = repo
            .create(&NewFolder::new("B").with_parent(Some(a.id)))
            .await
            .unwrap();
        sqlx::query("UPDATE folders SET parent_id = ? WHERE id = ?")
            .bind(b.id)
            .bind(a.id)
            .execute(db.pool())
            .await
            .unwrap();

        let path = repo.get_path(b.id).await.unwrap();
        assert_eq!(path.len(), 2);
    }

    #[tokio::test]
    async fn test_count() {
        let db = setup_db().await;
        let repo = FolderRepository::new(db.pool());

        assert_eq!(repo.count().await.unwrap(), 0);
        repo.create(&NewFolder::new("One")).await.unwrap();
        repo.create(&NewFolder::new("Two")).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
