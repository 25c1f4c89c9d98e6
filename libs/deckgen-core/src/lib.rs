//! Core library for the deckgen backend.
//!
//! Provides the pure, I/O-free building blocks of the pipeline:
//! - Byte-signature detection for uploaded files
//! - Word-based chunking of extracted text
//! - Defensive parsing of model-generated flashcard JSON
//! - Shared types (Flashcard, FileKind)

pub mod chunk;
pub mod detect;
pub mod error;
pub mod response;
pub mod types;

pub use chunk::{chunk_words, DEFAULT_CHUNK_WORDS};
pub use detect::detect;
pub use error::{DetectError, ResponseError};
pub use response::{parse_flashcards, strip_code_fences};
pub use types::{FileKind, Flashcard};
