//! In-memory document store.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError, WriteBatch};

static SHARED: OnceLock<Arc<MemoryStore>> = OnceLock::new();

/// In-memory hierarchical document store.
///
/// Documents are keyed by their full slash-joined path. A collection read
/// returns the direct children of the collection path in key order;
/// documents in subcollections are not included.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<BTreeMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide store handle. Safe to call repeatedly; every call after
    /// the first returns the same instance.
    pub fn shared() -> Arc<MemoryStore> {
        SHARED.get_or_init(|| Arc::new(MemoryStore::new())).clone()
    }

    /// Number of documents currently held.
    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_collection(&self, path: &str) -> Result<Vec<Value>, StoreError> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        let docs = self.docs.read().await;
        Ok(docs
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(_, doc)| doc.clone())
            .collect())
    }

    async fn set_document(&self, path: &str, doc: Value) -> Result<(), StoreError> {
        self.docs.write().await.insert(path.to_string(), doc);
        Ok(())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        // One write guard for the whole batch makes the commit atomic with
        // respect to every other store operation.
        let mut docs = self.docs.write().await;
        for (path, doc) in batch.into_writes() {
            docs.insert(path, doc);
        }
        Ok(())
    }
}
