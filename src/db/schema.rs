//! Database schema and migrations for fileshelf.
//!
//! Migrations are applied sequentially when the database is first opened or
//! upgraded. Timestamps are stored as RFC 3339 UTC text with millisecond
//! precision so that creation order survives sub-second inserts.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Folders table
    r#"
-- parent_id is a weak back-reference: no foreign key, the cascade is done by
-- the folder service.
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    parent_id   INTEGER,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Sibling names are unique; root folders (NULL parent) share the 0 bucket.
CREATE UNIQUE INDEX idx_folders_parent_name ON folders(COALESCE(parent_id, 0), name);
CREATE INDEX idx_folders_parent_id ON folders(parent_id);
CREATE INDEX idx_folders_created_at ON folders(created_at);
"#,
    // v2: Files table
    r#"
CREATE TABLE files (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    mime_type   TEXT NOT NULL,
    size_bytes  INTEGER NOT NULL,
    blob_path   TEXT NOT NULL UNIQUE,
    folder_id   INTEGER,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX idx_files_folder_id ON files(folder_id);
CREATE INDEX idx_files_created_at ON files(created_at);
"#,
];
