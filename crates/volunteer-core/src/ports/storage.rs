//! Storage trait for collection persistence

use crate::{Collection, Result};
use async_trait::async_trait;
use serde_json::Value;

/// Durable key-space holding each collection as one serialized record list.
///
/// There is no per-record primitive: callers read the whole collection,
/// change it in memory and replace it. `replace_collection` must be atomic,
/// so a concurrent reader sees either the old or the new list, never a mix.
#[async_trait]
pub trait CollectionBackend: Send + Sync {
    /// Records in insertion order. A collection never written reads as empty.
    async fn read_collection(&self, collection: Collection) -> Result<Vec<Value>>;

    async fn replace_collection(&self, collection: Collection, records: Vec<Value>) -> Result<()>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}
