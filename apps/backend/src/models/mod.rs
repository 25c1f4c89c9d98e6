//! Deck/card records and API types.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Deck lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeckState {
    Active,
    Archived,
}

impl Default for DeckState {
    fn default() -> Self {
        Self::Active
    }
}

/// Scheduling category of a card. Opaque to this pipeline; carried through
/// unchanged for the client's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    New,
    Learning,
    Review,
    Relearning,
}

impl Default for CardType {
    fn default() -> Self {
        Self::New
    }
}

fn default_deck_color() -> String {
    "#6366F1".to_string()
}

fn default_true() -> bool {
    true
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// A named collection of flashcards belonging to one user.
///
/// Every field carries a serde default so a partial client snapshot
/// deserializes into a fully-populated record; id presence is enforced by
/// sync validation, not by serde.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_deck_color")]
    pub color: String,
    #[serde(default)]
    pub is_synced: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub state: DeckState,
    #[serde(default)]
    pub study_schedule: i64,
    #[serde(default)]
    pub streak: i64,
    /// Epoch seconds, set at creation and never mutated.
    #[serde(default = "now_secs")]
    pub created_at: i64,
}

impl Deck {
    /// New deck with a generated id and creation timestamp.
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: None,
            color: default_deck_color(),
            is_synced: false,
            is_public: true,
            state: DeckState::Active,
            study_schedule: 0,
            streak: 0,
            created_at: now_secs(),
        }
    }
}

/// A single front/back flashcard belonging to exactly one deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub deck_id: String,
    #[serde(default, rename = "type")]
    pub card_type: CardType,
    /// Epoch milliseconds; defaults to the creation time.
    #[serde(default = "now_millis")]
    pub due: i64,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub is_synced: bool,
    /// Epoch milliseconds, set at creation and never mutated.
    #[serde(default = "now_millis")]
    pub created_at: i64,
}

impl Card {
    /// New card under `deck_id` with a generated id; `due` starts at the
    /// creation time.
    pub fn new(deck_id: &str, front: &str, back: &str) -> Self {
        let created_at = now_millis();
        Self {
            id: Uuid::new_v4().to_string(),
            deck_id: deck_id.to_string(),
            card_type: CardType::New,
            due: created_at,
            front: front.to_string(),
            back: back.to_string(),
            tags: String::new(),
            is_synced: false,
            created_at,
        }
    }
}

// === API Request/Response Types ===

/// One user's decks and cards, as transferred between client and store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSnapshot {
    #[serde(default)]
    pub decks: Vec<Deck>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

/// Response of the generate endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub deck: Deck,
    pub cards: Vec<Card>,
}
