//! Configuration module for fileshelf.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ShelfError};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Whether to serve the built client UI as static files.
    #[serde(default)]
    pub serve_static: bool,
    /// Path to static files directory.
    #[serde(default = "default_static_path")]
    pub static_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_path() -> String {
    "web/dist".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            serve_static: false,
            static_path: default_static_path(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/fileshelf.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Blob storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend (`local` or `memory`).
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Root directory for the local backend.
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_backend() -> String {
    "local".to_string()
}

fn default_storage_path() -> String {
    "data/uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl StorageConfig {
    /// Upload cap in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file; empty logs to stdout only.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/fileshelf.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ShelfError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ShelfError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILESHELF_HOST`
    /// - `FILESHELF_PORT`
    /// - `FILESHELF_DATABASE_PATH`
    /// - `FILESHELF_STORAGE_PATH`
    /// - `FILESHELF_CORS_ORIGINS` (comma-separated)
    ///
    /// Empty values are ignored, as are ports that do not parse.
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = non_empty_env("FILESHELF_HOST") {
            self.server.host = host;
        }

        if let Some(port) = non_empty_env("FILESHELF_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(path) = non_empty_env("FILESHELF_DATABASE_PATH") {
            self.database.path = path;
        }

        if let Some(path) = non_empty_env("FILESHELF_STORAGE_PATH") {
            self.storage.path = path;
        }

        if let Some(origins) = non_empty_env("FILESHELF_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage.max_upload_size_mb == 0 {
            return Err(ShelfError::Config(
                "storage.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }

        match self.storage.backend.as_str() {
            "local" | "memory" => Ok(()),
            other => Err(ShelfError::Config(format!(
                "unknown storage backend '{other}' (expected 'local' or 'memory')"
            ))),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5000);
        assert!(config.server.cors_origins.is_empty());
        assert!(!config.server.serve_static);
        assert_eq!(config.server.static_path, "web/dist");

        assert_eq!(config.database.path, "data/fileshelf.db");

        assert_eq!(config.storage.backend, "local");
        assert_eq!(config.storage.path, "data/uploads");
        assert_eq!(config.storage.max_upload_size_mb, 10);
        assert_eq!(config.storage.max_upload_size_bytes(), 10 * 1024 * 1024);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/fileshelf.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 8080
cors_origins = ["http://localhost:5173", "https://files.example.com"]
serve_static = true
static_path = "public"

[database]
path = "custom/db.sqlite"

[storage]
backend = "memory"
path = "custom/blobs"
max_upload_size_mb = 25

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors_origins.len(), 2);
        assert_eq!(config.server.cors_origins[0], "http://localhost:5173");
        assert!(config.server.serve_static);
        assert_eq!(config.server.static_path, "public");

        assert_eq!(config.database.path, "custom/db.sqlite");

        assert_eq!(config.storage.backend, "memory");
        assert_eq!(config.storage.path, "custom/blobs");
        assert_eq!(config.storage.max_upload_size_mb, 25);

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[server]
port = 3000
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.path, "data/fileshelf.db");
        assert_eq!(config.storage.max_upload_size_mb, 10);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.storage.backend, "local");
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        assert!(result.is_err());
        if let Err(ShelfError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(ShelfError::Io(_))));
    }

    // All env-var assertions live in one test so parallel tests never race on
    // the process environment.
    #[test]
    fn test_apply_env_overrides() {
        let keys = [
            "FILESHELF_HOST",
            "FILESHELF_PORT",
            "FILESHELF_DATABASE_PATH",
            "FILESHELF_STORAGE_PATH",
            "FILESHELF_CORS_ORIGINS",
        ];
        let originals: Vec<Option<String>> = keys.iter().map(|k| std::env::var(k).ok()).collect();

        std::env::set_var("FILESHELF_HOST", "127.0.0.1");
        std::env::set_var("FILESHELF_PORT", "9000");
        std::env::set_var("FILESHELF_DATABASE_PATH", "/tmp/env.db");
        std::env::set_var("FILESHELF_STORAGE_PATH", "");
        std::env::set_var(
            "FILESHELF_CORS_ORIGINS",
            "http://localhost:5173, https://app.example.com,",
        );

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.database.path, "/tmp/env.db");
        // Empty value does not override
        assert_eq!(config.storage.path, "data/uploads");
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:5173", "https://app.example.com"]
        );

        std::env::set_var("FILESHELF_PORT", "not-a-port");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.server.port, 5000);

        for (key, original) in keys.iter().zip(originals) {
            match original {
                Some(val) => std::env::set_var(key, val),
                None => std::env::remove_var(key),
            }
        }
    }

    #[test]
    fn test_validate_default() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_upload_size() {
        let mut config = Config::default();
        config.storage.max_upload_size_mb = 0;
        assert!(matches!(config.validate(), Err(ShelfError::Config(_))));
    }

    #[test]
    fn test_validate_unknown_backend() {
        let mut config = Config::default();
        config.storage.backend = "cloud".to_string();

        let result = config.validate();
        if let Err(ShelfError::Config(msg)) = result {
            assert!(msg.contains("cloud"));
        } else {
            panic!("Expected Config error");
        }
    }
}
