//! Fixed-dictionary word encoding: 11 bits per word over a 2048-word list.
//!
//! The whole input is consumed, so a digest of `n` bits always becomes
//! `ceil(n / 11)` space-separated words. Used for the compact word-sequence
//! rendering of an identity fingerprint.

use std::sync::Arc;

use crate::bits::BitReader;
use crate::error::CodecError;
use crate::wordlist::WordList;

/// Required dictionary length. At 2048 entries every full group carries
/// exactly 11 bits.
pub const DICTIONARY_WORDS: usize = 2048;

/// Bits consumed per full dictionary word.
pub const BITS_PER_WORD: usize = 11;

/// Encodes byte sequences as space-separated words from a fixed
/// 2048-entry dictionary.
///
/// Cheap to clone; the dictionary is shared behind an `Arc`, so concurrent
/// encodes against the same dictionary need no locking.
#[derive(Debug, Clone)]
pub struct MnemonicEncoder {
    dictionary: Arc<WordList>,
}

impl MnemonicEncoder {
    /// Creates an encoder over `dictionary`.
    ///
    /// Fails fast with `InvalidDictionarySize` unless the dictionary has
    /// exactly [`DICTIONARY_WORDS`] entries, before any bits are read.
    pub fn new(dictionary: WordList) -> Result<Self, CodecError> {
        if dictionary.len() != DICTIONARY_WORDS {
            return Err(CodecError::InvalidDictionarySize {
                expected: DICTIONARY_WORDS,
                actual: dictionary.len(),
            });
        }
        Ok(Self {
            dictionary: Arc::new(dictionary),
        })
    }

    /// Encodes `bytes` as one dictionary word per 11-bit group.
    ///
    /// Words are joined with single spaces, no trailing separator or
    /// newline. Empty input encodes to the empty string.
    ///
    /// A final group shorter than 11 bits is looked up by its raw value,
    /// so the last word can only come from the low end of the dictionary.
    /// Kept for compatibility: previously generated phrases would no
    /// longer verify if the tail were re-padded.
    pub fn encode(&self, bytes: &[u8]) -> Result<String, CodecError> {
        let mut reader = BitReader::new(bytes);
        let mut words = Vec::with_capacity((bytes.len() * 8).div_ceil(BITS_PER_WORD));
        while reader.remaining_bits() > 0 {
            let width = reader.remaining_bits().min(BITS_PER_WORD) as u8;
            let index = reader.read_bits(width)?;
            words.push(self.dictionary.word(index as usize));
        }
        tracing::trace!(
            words = words.len(),
            bits = reader.bit_position(),
            "encoded mnemonic"
        );
        Ok(words.join(" "))
    }

    /// Encodes on a blocking worker thread, for callers on an async
    /// runtime. Dictionary loading and digest computation are expected to
    /// have completed before this call; the encode itself is pure CPU.
    pub async fn encode_background(&self, bytes: Vec<u8>) -> Result<String, CodecError> {
        let encoder = self.clone();
        tokio::task::spawn_blocking(move || encoder.encode(&bytes))
            .await
            .map_err(|e| CodecError::TaskFailed(e.to_string()))?
    }
}
