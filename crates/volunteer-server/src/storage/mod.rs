//! Storage layer
//!
//! Picks the persistence backend named in the configuration. JSON files are
//! the default; SQLite and memory are available for other deployments.

use crate::config::{ServerConfig, StorageKind};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use volunteer_core::{CollectionBackend, JsonFileBackend, MemoryBackend, SqliteBackend};

pub async fn open_backend(config: &ServerConfig) -> Result<Arc<dyn CollectionBackend>> {
    let backend: Arc<dyn CollectionBackend> = match config.storage {
        StorageKind::Json => {
            info!("Using JSON file storage in {}", config.data_dir.display());
            let backend = JsonFileBackend::open(&config.data_dir)
                .await
                .with_context(|| {
                    format!("Failed to open data directory {}", config.data_dir.display())
                })?;
            Arc::new(backend)
        }
        StorageKind::Sqlite => {
            let path = config.database_path();
            let path = path.to_string_lossy();
            info!("Using SQLite storage at {}", path);
            let backend = SqliteBackend::open(&path)
                .await
                .with_context(|| format!("Failed to open SQLite database {}", path))?;
            Arc::new(backend)
        }
        StorageKind::Memory => {
            warn!("Using in-memory storage, nothing will be persisted");
            Arc::new(MemoryBackend::new())
        }
    };

    Ok(backend)
}
