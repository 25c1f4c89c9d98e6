//! File format detection via leading byte signatures.

use crate::error::DetectError;
use crate::types::FileKind;

/// Detect the format of an uploaded file from its magic bytes.
///
/// PDF, PNG, JPEG and GIF are supported; anything else is
/// [`DetectError::Unknown`] and an empty input is [`DetectError::Empty`].
pub fn detect(bytes: &[u8]) -> Result<FileKind, DetectError> {
    if bytes.is_empty() {
        return Err(DetectError::Empty);
    }

    if bytes.starts_with(b"%PDF") {
        Ok(FileKind::Pdf)
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Ok(FileKind::Png)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Ok(FileKind::Jpeg)
    } else if bytes.starts_with(b"GIF") {
        Ok(FileKind::Gif)
    } else {
        Err(DetectError::Unknown)
    }
}
