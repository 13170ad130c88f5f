//! Logging setup for fileshelf.
//!
//! The configured level applies to this crate and to request traces from
//! `tower_http`. sqlx query logging stays at `warn` unless `RUST_LOG` asks for
//! more; a set `RUST_LOG` replaces these defaults entirely.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::Result;

const KNOWN_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Normalize a configured level, falling back to `info`.
fn normalize_level(level: &str) -> &'static str {
    let level = level.trim().to_ascii_lowercase();
    let level = if level == "warning" { "warn" } else { level.as_str() };
    KNOWN_LEVELS
        .into_iter()
        .find(|known| *known == level)
        .unwrap_or("info")
}

/// Default filter directives for a configured level.
fn default_directives(level: &str) -> String {
    let level = normalize_level(level);
    format!("fileshelf={level},tower_http={level},sqlx=warn,warn")
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Initialize logging to stdout and, when `config.file` is set, to that file.
///
/// The log file is appended to, so restarts keep earlier history. Its parent
/// directory is created if needed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level);
    let stdout = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true);

    if config.file.trim().is_empty() {
        tracing_subscriber::registry()
            .with(stdout)
            .with(filter)
            .init();
        return Ok(());
    }

    let path = Path::new(&config.file);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_file = Arc::new(OpenOptions::new().create(true).append(true).open(path)?);

    tracing_subscriber::registry()
        .with(stdout)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(filter)
        .init();

    Ok(())
}

/// Initialize console-only logging, used when the log file cannot be opened.
pub fn init_console_only(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(build_filter(level))
        .init();
}
