//! Ordered word lists backing both encoders.
//!
//! Lists are supplied by the surrounding application as bundled resource
//! files with one word per line. The constructors here cover the parsing
//! half of that collaboration; opening the file stays with the caller, so
//! the codec itself performs no file I/O.

use std::io::BufRead;

use crate::error::CodecError;

/// An ordered, immutable, 0-indexed list of words.
///
/// Guaranteed non-empty after construction. Indexing is always driven by a
/// bit group of [`index_bits`](WordList::index_bits) width, which cannot
/// exceed the list length.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Wraps an already-parsed list of words.
    ///
    /// Fails with `WordListUnavailable` on an empty list; the encoders
    /// never operate with an incomplete dictionary.
    pub fn new(words: Vec<String>) -> Result<Self, CodecError> {
        if words.is_empty() {
            return Err(CodecError::WordListUnavailable(
                "word list is empty".into(),
            ));
        }
        Ok(Self { words })
    }

    /// Parses one word per line from an in-memory string.
    ///
    /// Surrounding whitespace is trimmed and blank lines are skipped.
    pub fn from_lines(text: &str) -> Result<Self, CodecError> {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    /// Reads one word per line from `reader` (UTF-8), e.g. a resource file
    /// opened by the caller.
    pub fn from_reader(reader: impl BufRead) -> Result<Self, CodecError> {
        let mut words = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                words.push(word.to_owned());
            }
        }
        Self::new(words)
    }

    /// Number of words in the list.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; present for container-API symmetry.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`. Encoder indices come from
    /// `index_bits`-wide reads and stay in range.
    pub fn word(&self, index: usize) -> &str {
        &self.words[index]
    }

    /// Bits needed to index this list: `floor(log2(len))`.
    ///
    /// Power-of-two lengths make every word reachable. Other lengths keep
    /// indexing in range but leave the top entries unselectable, shrinking
    /// the effective alphabet.
    pub fn index_bits(&self) -> u8 {
        (usize::BITS - 1 - self.words.len().leading_zeros()) as u8
    }
}
