//! fileshelf - hierarchical file and folder manager
//!
//! A REST backend for nested folders and uploaded files, with blob contents
//! kept in a pluggable storage backend and a cascading folder delete.

pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{Result, ShelfError};
pub use file::{
    BlobStore, DeleteSummary, FileMetadata, FileService, Folder, FolderService, LocalBlobStore,
    MemoryBlobStore, UploadRequest,
};
pub use web::{AppState, WebServer};
