//! Defensive parsing of model-generated flashcard JSON.

use serde_json::Value;

use crate::error::ResponseError;
use crate::types::Flashcard;

/// Strip optional markdown code fencing from a model response.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Parse a model response into flashcards.
///
/// The response must be a JSON array of objects. Items without a non-empty
/// string `front` and `back` are dropped rather than failing the whole
/// response, and valid JSON that is not an array yields no cards. Invalid
/// JSON is [`ResponseError::Malformed`].
pub fn parse_flashcards(raw: &str) -> Result<Vec<Flashcard>, ResponseError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            let front = item.get("front")?.as_str()?;
            let back = item.get("back")?.as_str()?;
            if front.is_empty() || back.is_empty() {
                return None;
            }
            Some(Flashcard {
                front: front.to_string(),
                back: back.to_string(),
            })
        })
        .collect())
}
