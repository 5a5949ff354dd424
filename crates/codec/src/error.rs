//! Error types for the phrasekey-codec crate.

use thiserror::Error;

/// Errors that can occur while encoding a fingerprint phrase.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The bit reader was asked for more bits than remain in the input.
    #[error("end of stream: requested {requested} bits, {available} remaining")]
    EndOfStream { requested: usize, available: usize },

    /// The mnemonic dictionary does not have the required number of entries.
    #[error("invalid dictionary size: expected {expected} words, got {actual}")]
    InvalidDictionarySize { expected: usize, actual: usize },

    /// A word list could not be loaded, or contained no words.
    #[error("word list unavailable: {0}")]
    WordListUnavailable(String),

    /// A background encode task was cancelled or panicked.
    #[error("encode task failed: {0}")]
    TaskFailed(String),
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        CodecError::WordListUnavailable(err.to_string())
    }
}
