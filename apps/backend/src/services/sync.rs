//! Sync reconciliation between a client snapshot and the store.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::models::{Card, Deck, SyncSnapshot};
use crate::store::{paths, DocumentStore, StoreError, WriteBatch};

/// Sync failures.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Writes a client snapshot atomically and returns the store's resulting
/// full snapshot for the user.
pub struct SyncReconciler {
    store: Arc<dyn DocumentStore>,
}

impl SyncReconciler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Reconcile `snapshot` into the user's hierarchy.
    ///
    /// Every deck must carry an id, and every card an id and a `deckId`
    /// that resolves to a deck in the snapshot or one already stored under
    /// the user. Any violation rejects the whole snapshot before a single
    /// write. All writes go into one atomic batch; after the commit the
    /// user's full deck and card collections are read back and returned.
    pub async fn sync(
        &self,
        user_id: &str,
        snapshot: &SyncSnapshot,
    ) -> Result<SyncSnapshot, SyncError> {
        self.validate(user_id, snapshot).await?;

        let mut batch = WriteBatch::new();
        for deck in &snapshot.decks {
            batch.set(paths::deck(user_id, &deck.id), to_doc(deck)?);
        }
        for card in &snapshot.cards {
            batch.set(
                paths::card(user_id, &card.deck_id, &card.id),
                to_doc(card)?,
            );
        }

        tracing::info!(
            user_id,
            decks = snapshot.decks.len(),
            cards = snapshot.cards.len(),
            "committing sync batch"
        );
        self.store.commit(batch).await.map_err(SyncError::Store)?;

        self.read_back(user_id).await.map_err(SyncError::Store)
    }

    async fn validate(&self, user_id: &str, snapshot: &SyncSnapshot) -> Result<(), SyncError> {
        for deck in &snapshot.decks {
            if deck.id.is_empty() {
                return Err(SyncError::Validation("deck must have an id".to_string()));
            }
        }

        let mut known_decks: HashSet<String> =
            snapshot.decks.iter().map(|d| d.id.clone()).collect();
        // Decks already stored under the user also satisfy card references.
        for doc in self
            .store
            .get_collection(&paths::decks(user_id))
            .await
            .map_err(SyncError::Store)?
        {
            if let Ok(deck) = serde_json::from_value::<Deck>(doc) {
                known_decks.insert(deck.id);
            }
        }

        for card in &snapshot.cards {
            if card.id.is_empty() {
                return Err(SyncError::Validation("card must have an id".to_string()));
            }
            if card.deck_id.is_empty() {
                return Err(SyncError::Validation(
                    "card must have a deckId".to_string(),
                ));
            }
            if !known_decks.contains(&card.deck_id) {
                return Err(SyncError::Validation(format!(
                    "card {} references deck {} which does not exist for this user",
                    card.id, card.deck_id
                )));
            }
        }

        Ok(())
    }

    /// Read the user's complete deck and card collections.
    pub async fn read_back(&self, user_id: &str) -> Result<SyncSnapshot, StoreError> {
        let mut decks = Vec::new();
        let mut cards = Vec::new();

        for doc in self.store.get_collection(&paths::decks(user_id)).await? {
            match serde_json::from_value::<Deck>(doc) {
                Ok(deck) => decks.push(deck),
                Err(err) => tracing::warn!(error = %err, "skipping malformed deck document"),
            }
        }

        for deck in &decks {
            for doc in self
                .store
                .get_collection(&paths::cards(user_id, &deck.id))
                .await?
            {
                match serde_json::from_value::<Card>(doc) {
                    Ok(card) => cards.push(card),
                    Err(err) => {
                        tracing::warn!(error = %err, deck_id = %deck.id, "skipping malformed card document")
                    }
                }
            }
        }

        Ok(SyncSnapshot { decks, cards })
    }
}

fn to_doc<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, SyncError> {
    serde_json::to_value(value).map_err(|e| SyncError::Store(StoreError::Write(e.to_string())))
}
