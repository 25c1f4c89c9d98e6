//! Deck and card persistence.

use std::sync::Arc;

use deckgen_core::types::Flashcard;

use crate::models::{Card, Deck};
use crate::store::{paths, DocumentStore, StoreError};

/// Creates decks and cards in the per-user hierarchy.
pub struct DeckCardRepository {
    store: Arc<dyn DocumentStore>,
}

impl DeckCardRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create one deck under the user's path.
    pub async fn create_deck(&self, user_id: &str, deck_name: &str) -> Result<Deck, StoreError> {
        let deck = Deck::new(deck_name);
        let doc = serde_json::to_value(&deck).map_err(|e| StoreError::Write(e.to_string()))?;
        self.store
            .set_document(&paths::deck(user_id, &deck.id), doc)
            .await?;
        Ok(deck)
    }

    /// Create one card under an existing deck.
    pub async fn create_card(
        &self,
        user_id: &str,
        deck_id: &str,
        front: &str,
        back: &str,
    ) -> Result<Card, StoreError> {
        let card = Card::new(deck_id, front, back);
        let doc = serde_json::to_value(&card).map_err(|e| StoreError::Write(e.to_string()))?;
        self.store
            .set_document(&paths::card(user_id, deck_id, &card.id), doc)
            .await?;
        Ok(card)
    }

    /// Persist one deck named `deck_name` containing the given flashcards.
    ///
    /// The deck write is fatal. Card writes are best-effort: a failed card
    /// write is logged and skipped, and the remaining flashcards are still
    /// attempted. Returns the deck and the cards that were actually
    /// created, in input order.
    pub async fn persist(
        &self,
        user_id: &str,
        deck_name: &str,
        flashcards: &[Flashcard],
    ) -> Result<(Deck, Vec<Card>), StoreError> {
        let deck = self.create_deck(user_id, deck_name).await?;
        tracing::info!(user_id, deck_id = %deck.id, deck_name, "created deck");

        let mut cards = Vec::with_capacity(flashcards.len());
        for flashcard in flashcards {
            match self
                .create_card(user_id, &deck.id, &flashcard.front, &flashcard.back)
                .await
            {
                Ok(card) => cards.push(card),
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        deck_id = %deck.id,
                        front = %flashcard.front,
                        "card creation failed, skipping"
                    );
                }
            }
        }

        tracing::info!(
            deck_id = %deck.id,
            created = cards.len(),
            requested = flashcards.len(),
            "persisted deck"
        );
        Ok((deck, cards))
    }
}
