//! File metadata types and repository for fileshelf.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{Result, ShelfError};

const FILE_COLUMNS: &str =
    "id, name, mime_type, size_bytes, blob_path, folder_id, created_at, updated_at";

/// Metadata for a stored file.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct FileMetadata {
    /// Unique file ID.
    pub id: i64,
    /// Original filename (display name).
    pub name: String,
    /// MIME type reported at upload time.
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Locator returned by the blob store.
    pub blob_path: String,
    /// Folder ID this file belongs to (None for unfiled).
    pub folder_id: Option<i64>,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new file entry.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub blob_path: String,
    pub folder_id: Option<i64>,
}

impl NewFile {
    /// Create a new unfiled NewFile.
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: i64,
        blob_path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            blob_path: blob_path.into(),
            folder_id: None,
        }
    }

    /// Set the containing folder.
    pub fn with_folder(mut self, folder_id: Option<i64>) -> Self {
        self.folder_id = folder_id;
        self
    }
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file record.
    pub async fn create(&self, file: &NewFile) -> Result<FileMetadata> {
        let result = sqlx::query(
            "INSERT INTO files (name, mime_type, size_bytes, blob_path, folder_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&file.name)
        .bind(&file.mime_type)
        .bind(file.size_bytes)
        .bind(&file.blob_path)
        .bind(file.folder_id)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ShelfError::NotFound("file".to_string()))
    }

    /// Get a file by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileMetadata>> {
        let file = sqlx::query_as::<_, FileMetadata>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(file)
    }

    /// List every file, newest first.
    pub async fn list_all(&self) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(&format!(
            "SELECT {FILE_COLUMNS} FROM files ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// List files in a folder, newest first.
    pub async fn list_by_folder(&self, folder_id: i64) -> Result<Vec<FileMetadata>> {
        let files = sqlx::query_as::<_, FileMetadata>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE folder_id = ?
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(folder_id)
        .fetch_all(self.pool)
        .await?;

        Ok(files)
    }

    /// Delete a file record.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count files in a folder.
    pub async fn count_by_folder(&self, folder_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files WHERE folder_id = ?")
            .bind(folder_id)
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{FolderRepository, NewFolder};
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_file() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let new_file = NewFile::new("report.pdf", "application/pdf", 1024, "ab/ab12.pdf");
        let file = repo.create(&new_file).await.unwrap();

        assert_eq!(file.name, "report.pdf");
        assert_eq!(file.mime_type, "application/pdf");
        assert_eq!(file.size_bytes, 1024);
        assert_eq!(file.blob_path, "ab/ab12.pdf");
        assert!(file.folder_id.is_none());
    }

    #[tokio::test]
    async fn test_get_file_by_id() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let created = repo
            .create(&NewFile::new("a.txt", "text/plain", 3, "blob-a"))
            .await
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(repo.get_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blob_path_unique() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        repo.create(&NewFile::new("a.txt", "text/plain", 1, "same"))
            .await
            .unwrap();
        let result = repo
            .create(&NewFile::new("b.txt", "text/plain", 1, "same"))
            .await;
        assert!(matches!(result, Err(ShelfError::Database(_))));
    }

    #[tokio::test]
    async fn test_list_all_and_by_folder() {
        let db = setup_db().await;
        let folders = FolderRepository::new(db.pool());
        let repo = FileRepository::new(db.pool());

        let docs = folders.create(&NewFolder::new("Docs")).await.unwrap();

        let first = repo
            .create(&NewFile::new("one.txt", "text/plain", 1, "b1").with_folder(Some(docs.id)))
            .await
            .unwrap();
        let second = repo
            .create(&NewFile::new("two.txt", "text/plain", 2, "b2").with_folder(Some(docs.id)))
            .await
            .unwrap();
        repo.create(&NewFile::new("loose.txt", "text/plain", 3, "b3"))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "loose.txt");

        let in_docs = repo.list_by_folder(docs.id).await.unwrap();
        let ids: Vec<_> = in_docs.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        assert!(repo.list_by_folder(9999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_file() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        let file = repo
            .create(&NewFile::new("gone.txt", "text/plain", 1, "gone"))
            .await
            .unwrap();

        assert!(repo.delete(file.id).await.unwrap());
        assert!(repo.get_by_id(file.id).await.unwrap().is_none());
        assert!(!repo.delete(file.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_count_by_folder() {
        let db = setup_db().await;
        let repo = FileRepository::new(db.pool());

        assert_eq!(repo.count_by_folder(1).await.unwrap(), 0);
        for i in 0..3 {
            repo.create(&NewFile::new("f", "text/plain", 1, format!("c{i}")).with_folder(Some(1)))
                .await
                .unwrap();
        }
        assert_eq!(repo.count_by_folder(1).await.unwrap(), 3);
    }

    #[test]
    fn test_new_file_builder() {
        let file = NewFile::new("x.png", "image/png", 10, "p").with_folder(Some(7));
        assert_eq!(file.folder_id, Some(7));
        assert_eq!(file.size_bytes, 10);
    }
}
