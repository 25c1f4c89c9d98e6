//! Test fixtures and factory functions for creating test data.

use serde_json::{json, Value};

/// Minimal bytes carrying a PDF signature.
pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4 test document".to_vec()
}

/// A text of `count` distinct words.
pub fn words(count: usize) -> String {
    (0..count)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A model response holding `count` flashcards labeled with `prefix`.
pub fn flashcard_response(prefix: &str, count: usize) -> String {
    let cards: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "front": format!("{} front {}", prefix, i + 1),
                "back": format!("{} back {}", prefix, i + 1),
            })
        })
        .collect();
    Value::Array(cards).to_string()
}

/// A sync request body with one deck and one card under it.
pub fn simple_snapshot(deck_id: &str, card_id: &str) -> Value {
    json!({
        "decks": [{ "id": deck_id, "name": "Biology" }],
        "cards": [{ "id": card_id, "deckId": deck_id, "front": "Q", "back": "A" }],
    })
}
