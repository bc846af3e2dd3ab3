use std::io;
use thiserror::Error;

/// Errors raised while building or loading a [`CharVocabulary`](crate::CharVocabulary).
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum VocabularyLoadError {
    /// The resource could not be read.
    #[error("failed to read vocabulary: {0}")]
    Io(#[from] io::Error),
    /// The same character is listed twice.
    #[error("duplicate character {ch:?} on line {line} (first seen on line {first_line})")]
    DuplicateChar {
        ch: char,
        line: usize,
        first_line: usize,
    },
    /// A line holds more than one character and is not a reserved token.
    #[error("line {line} holds {entry:?}, expected exactly one character")]
    MultiCharEntry { line: usize, entry: String },
    /// A reserved entry (pad or unknown) never appears.
    #[error("reserved token {token} is missing")]
    MissingReserved { token: &'static str },
    /// A reserved entry appears more than once.
    #[error("reserved token {token} repeated on line {line}")]
    DuplicateReserved { token: &'static str, line: usize },
    /// No character entries at all.
    #[error("vocabulary has no character entries")]
    Empty,
}
