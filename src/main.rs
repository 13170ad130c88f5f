use std::sync::Arc;

use tracing::{error, info};

use fileshelf::{
    web, AppState, BlobStore, Config, Database, LocalBlobStore, MemoryBlobStore, WebServer,
};

fn build_storage(config: &Config) -> fileshelf::Result<Arc<dyn BlobStore>> {
    match config.storage.backend.as_str() {
        "memory" => {
            info!("Using in-memory blob storage; uploads are lost on restart");
            Ok(Arc::new(MemoryBlobStore::new()))
        }
        _ => {
            let storage = LocalBlobStore::new(&config.storage.path)?;
            info!("File storage initialized at: {}", config.storage.path);
            Ok(Arc::new(storage))
        }
    }
}

async fn run(config: Config) -> fileshelf::Result<()> {
    let db = Database::open(&config.database.path).await?;
    let storage = build_storage(&config)?;

    let state = AppState::new(db.clone(), storage)
        .with_max_upload_size(config.storage.max_upload_size_bytes());
    let server = WebServer::new(&config.server, state)?;

    let result = server.run(web::shutdown_signal()).await;
    db.close().await;

    result.map_err(fileshelf::ShelfError::Io)
}

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = fileshelf::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        fileshelf::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{e}");
        std::process::exit(1);
    }

    info!("fileshelf {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = run(config).await {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}
