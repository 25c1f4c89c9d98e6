//! Word-based chunking of extracted text.

/// Default number of words per chunk sent to the generation stage.
pub const DEFAULT_CHUNK_WORDS: usize = 1000;

/// Split `text` on whitespace and group the words into chunks of at most
/// `chunk_size` words, preserving order.
///
/// Words are re-joined with single spaces, so the exact whitespace of the
/// input is not preserved but the word sequence is. A chunk size of zero is
/// treated as one.
pub fn chunk_words(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(chunk_size).map(|w| w.join(" ")).collect()
}
