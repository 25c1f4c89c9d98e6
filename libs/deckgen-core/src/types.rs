//! Shared types for the generation pipeline.

use serde::{Deserialize, Serialize};

/// Supported upload formats, identified by leading byte signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Png,
    Jpeg,
    Gif,
}

impl FileKind {
    /// Whether this format is handled by the OCR path.
    pub fn is_image(self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// A front/back pair produced by the generation stage.
///
/// Not an identity-bearing entity; it becomes a card only when persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}
