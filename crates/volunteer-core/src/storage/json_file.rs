//! JSON file backend: one pretty-printed array per collection

use crate::ports::CollectionBackend;
use crate::{Collection, Result, StoreError};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Stores `volunteers.json`, `events.json` and `hours.json` under one
/// directory. Writes go to a temporary file that is synced and then renamed
/// over the target, so readers never see a half-written array.
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Open (and if needed create) the data directory, seeding missing
    /// collection files with an empty array.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            StoreError::Storage(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        let backend = Self { dir };
        for collection in Collection::ALL {
            let path = backend.path_for(collection);
            if !tokio::fs::try_exists(&path).await? {
                tokio::fs::write(&path, b"[]").await?;
                info!("Created {}", path.display());
            }
        }

        Ok(backend)
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn temp_path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!(
            ".{}.json.{}.tmp",
            collection.as_str(),
            uuid::Uuid::new_v4().simple()
        ))
    }
}

#[async_trait]
impl CollectionBackend for JsonFileBackend {
    async fn read_collection(&self, collection: Collection) -> Result<Vec<Value>> {
        let path = self.path_for(collection);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} missing, treating as empty", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::Storage(format!("Corrupt collection file {}: {}", path.display(), e))
        })
    }

    async fn replace_collection(&self, collection: Collection, records: Vec<Value>) -> Result<()> {
        let path = self.path_for(collection);
        let tmp = self.temp_path_for(collection);
        let body = serde_json::to_vec_pretty(&records)?;

        let mut file = tokio::fs::File::create(&tmp).await?;
        let written = async {
            file.write_all(&body).await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(
            "Wrote {} records to {}",
            records.len(),
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "json"
    }
}
