//! Hierarchical document store abstraction.
//!
//! The backing store is an external collaborator; the pipeline only needs
//! key-path reads, writes and atomic batch commits. [`memory::MemoryStore`]
//! is the in-process implementation used by the binary and by tests.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store read failed: {0}")]
    Read(String),

    #[error("store write failed: {0}")]
    Write(String),

    #[error("store commit failed: {0}")]
    Commit(String),
}

/// A set of document writes applied atomically by [`DocumentStore::commit`].
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
    writes: Vec<(String, Value)>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a write of `doc` at `path`.
    pub fn set(&mut self, path: impl Into<String>, doc: Value) {
        self.writes.push((path.into(), doc));
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the batch, yielding the queued writes in insertion order.
    pub fn into_writes(self) -> Vec<(String, Value)> {
        self.writes
    }
}

/// Key-path document store with atomic batch commits.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every document directly under a collection path.
    async fn get_collection(&self, path: &str) -> Result<Vec<Value>, StoreError>;

    /// Write a single document at `path`, replacing any existing one.
    async fn set_document(&self, path: &str, doc: Value) -> Result<(), StoreError>;

    /// Apply every write in `batch` atomically: either the whole batch is
    /// applied or none of it is.
    async fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Path builders for the per-user deck/card hierarchy.
pub mod paths {
    /// Collection of a user's decks.
    pub fn decks(user_id: &str) -> String {
        format!("users/{}/decks", user_id)
    }

    /// A single deck document.
    pub fn deck(user_id: &str, deck_id: &str) -> String {
        format!("users/{}/decks/{}", user_id, deck_id)
    }

    /// Collection of cards under one deck.
    pub fn cards(user_id: &str, deck_id: &str) -> String {
        format!("users/{}/decks/{}/cards", user_id, deck_id)
    }

    /// A single card document.
    pub fn card(user_id: &str, deck_id: &str, card_id: &str) -> String {
        format!("users/{}/decks/{}/cards/{}", user_id, deck_id, card_id)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(paths::decks("u1"), "users/u1/decks");
        assert_eq!(paths::deck("u1", "d1"), "users/u1/decks/d1");
        assert_eq!(paths::cards("u1", "d1"), "users/u1/decks/d1/cards");
        assert_eq!(
            paths::card("u1", "d1", "c1"),
            "users/u1/decks/d1/cards/c1"
        );
    }

    #[test]
    fn test_write_batch_preserves_order() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch.set("a/1", json!({"n": 1}));
        batch.set("a/2", json!({"n": 2}));
        assert_eq!(batch.len(), 2);

        let writes = batch.into_writes();
        assert_eq!(writes[0].0, "a/1");
        assert_eq!(writes[1].0, "a/2");
    }
}
