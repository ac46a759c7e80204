//! In-memory backend using DashMap

use crate::ports::CollectionBackend;
use crate::{Collection, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Keeps every collection in process memory. Nothing survives a restart.
pub struct MemoryBackend {
    data: Arc<DashMap<Collection, Arc<Vec<Value>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectionBackend for MemoryBackend {
    async fn read_collection(&self, collection: Collection) -> Result<Vec<Value>> {
        // Clone the Arc out so the shard guard is released before copying
        let snapshot = self.data.get(&collection).map(|entry| entry.value().clone());
        Ok(snapshot.map(|records| records.as_ref().clone()).unwrap_or_default())
    }

    async fn replace_collection(&self, collection: Collection, records: Vec<Value>) -> Result<()> {
        self.data.insert(collection, Arc::new(records));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
