//! Web API module for fileshelf.
//!
//! This module exposes the folder tree and file store as a JSON REST API,
//! with an OpenAPI document served through Swagger UI.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::{shutdown_signal, WebServer};
