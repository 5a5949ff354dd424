//! Grammar-based sentence encoding of fingerprint bytes.
//!
//! Renders a digest as pseudo-English sentences: every word choice and
//! every optional clause consumes bits from the input, and sentences are
//! emitted until the requested entropy has been reached. Compared to the
//! fixed-dictionary rendering this trades length for readability: the
//! output reads aloud as (nonsense) English.
//!
//! Grammar, per sentence:
//!
//! ```text
//! Sentence   := NounPhrase (" " TransitiveVerb " " NounPhrase | " " IntransitiveVerb)
//!               [" " Adverb] [" " Preposition]
//! NounPhrase := Article " " [Adjective " "] Noun
//! ```
//!
//! Each word choice consumes `floor(log2(list length))` bits to index its
//! list; each optional clause is gated by one flag bit, which also counts
//! toward the entropy total. The preposition ends its sentence; no object
//! noun phrase follows it.

use std::sync::Arc;

use crate::bits::BitReader;
use crate::error::CodecError;
use crate::wordlist::WordList;

/// The seven part-of-speech lists the sentence grammar draws from.
///
/// Lists are loaded and parsed by the caller (see
/// [`WordList`](crate::wordlist::WordList)); each is guaranteed non-empty.
/// Power-of-two lengths make every word reachable.
#[derive(Debug)]
pub struct GrammarLists {
    pub nouns: WordList,
    pub intransitive_verbs: WordList,
    pub transitive_verbs: WordList,
    pub adjectives: WordList,
    pub adverbs: WordList,
    pub prepositions: WordList,
    pub articles: WordList,
}

/// Output buffer paired with a running count of encoded bits.
#[derive(Debug, Default)]
struct EntropyString {
    text: String,
    bits: usize,
}

impl EntropyString {
    /// Appends text that carries no entropy (separators, newlines).
    fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Appends a word chosen by `bits` bits of input.
    fn push_word(&mut self, word: &str, bits: usize) {
        self.text.push_str(word);
        self.bits += bits;
    }

    /// Counts one consumed flag bit.
    fn count_flag(&mut self) {
        self.bits += 1;
    }

    /// Appends a completed phrase, carrying its entropy across.
    fn append(&mut self, phrase: EntropyString) {
        self.text.push_str(&phrase.text);
        self.bits += phrase.bits;
    }

    fn bits(&self) -> usize {
        self.bits
    }
}

/// Encodes byte sequences as newline-terminated pseudo-English sentences.
///
/// Cheap to clone; the grammar lists are shared behind an `Arc`, so
/// concurrent encodes need no locking.
#[derive(Debug, Clone)]
pub struct SentenceEncoder {
    lists: Arc<GrammarLists>,
}

impl SentenceEncoder {
    /// Creates an encoder over the seven grammar lists.
    pub fn new(lists: GrammarLists) -> Self {
        Self {
            lists: Arc::new(lists),
        }
    }

    /// Encodes `bytes` until at least `desired_bytes * 8` bits are
    /// consumed. The strength values used by identity verification are
    /// typically 10 or 16.
    pub fn encode(&self, bytes: &[u8], desired_bytes: usize) -> Result<String, CodecError> {
        self.encode_bits(bytes, desired_bytes * 8)
    }

    /// Encodes `bytes` until at least `desired_bits` bits are consumed.
    ///
    /// Only whole sentences are emitted: at least one sentence is produced
    /// even for a target of zero, and because the entropy check runs after
    /// each completed sentence, the final total may overshoot the target
    /// by the remainder of that sentence's decisions.
    ///
    /// Fails with `EndOfStream` when the input runs out before the target
    /// is reached. Flag bits and index groups consume more than the
    /// nominal minimum, so callers should provision noticeably more than
    /// `desired_bits / 8` input bytes.
    pub fn encode_bits(&self, bytes: &[u8], desired_bits: usize) -> Result<String, CodecError> {
        let mut reader = BitReader::new(bytes);
        let mut fingerprint = EntropyString::default();
        loop {
            let sentence = self.sentence(&mut reader)?;
            fingerprint.append(sentence);
            fingerprint.push_str("\n");
            if fingerprint.bits() >= desired_bits {
                break;
            }
        }
        tracing::trace!(
            bits = fingerprint.bits(),
            target = desired_bits,
            "encoded sentence fingerprint"
        );
        Ok(fingerprint.text)
    }

    /// Encodes on a blocking worker thread, for callers on an async
    /// runtime. See [`encode`](Self::encode).
    pub async fn encode_background(
        &self,
        bytes: Vec<u8>,
        desired_bytes: usize,
    ) -> Result<String, CodecError> {
        let encoder = self.clone();
        tokio::task::spawn_blocking(move || encoder.encode(&bytes, desired_bytes))
            .await
            .map_err(|e| CodecError::TaskFailed(e.to_string()))?
    }

    /// Produces one grammatically complete sentence, without the trailing
    /// newline.
    fn sentence(&self, reader: &mut BitReader<'_>) -> Result<EntropyString, CodecError> {
        let mut sentence = self.noun_phrase(reader)?; // subject

        let transitive = reader.read_bit()?;
        sentence.count_flag();
        if transitive {
            sentence.push_str(" ");
            let (verb, bits) = pick(&self.lists.transitive_verbs, reader)?;
            sentence.push_word(verb, bits);
            sentence.push_str(" ");
            let object = self.noun_phrase(reader)?;
            sentence.append(object);
        } else {
            sentence.push_str(" ");
            let (verb, bits) = pick(&self.lists.intransitive_verbs, reader)?;
            sentence.push_word(verb, bits);
        }

        let adverb = reader.read_bit()?;
        sentence.count_flag();
        if adverb {
            sentence.push_str(" ");
            let (word, bits) = pick(&self.lists.adverbs, reader)?;
            sentence.push_word(word, bits);
        }

        let preposition = reader.read_bit()?;
        sentence.count_flag();
        if preposition {
            sentence.push_str(" ");
            let (word, bits) = pick(&self.lists.prepositions, reader)?;
            sentence.push_word(word, bits);
        }

        Ok(sentence)
    }

    /// `Article [Adjective] Noun`, space separated.
    fn noun_phrase(&self, reader: &mut BitReader<'_>) -> Result<EntropyString, CodecError> {
        let mut phrase = EntropyString::default();
        let (article, bits) = pick(&self.lists.articles, reader)?;
        phrase.push_word(article, bits);

        let adjective = reader.read_bit()?;
        phrase.count_flag();
        if adjective {
            phrase.push_str(" ");
            let (word, bits) = pick(&self.lists.adjectives, reader)?;
            phrase.push_word(word, bits);
        }

        phrase.push_str(" ");
        let (noun, bits) = pick(&self.lists.nouns, reader)?;
        phrase.push_word(noun, bits);
        Ok(phrase)
    }
}

/// Chooses one word from `list`, consuming `floor(log2(len))` bits.
fn pick<'w>(
    list: &'w WordList,
    reader: &mut BitReader<'_>,
) -> Result<(&'w str, usize), CodecError> {
    let width = list.index_bits();
    let index = reader.read_bits(width)? as usize;
    Ok((list.word(index), usize::from(width)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(prefix: &str, n: usize) -> WordList {
        WordList::new((0..n).map(|i| format!("{prefix}{i}")).collect()).unwrap()
    }

    /// Power-of-two lists so every decision width is exact.
    fn test_lists() -> GrammarLists {
        GrammarLists {
            nouns: numbered("noun", 16),
            intransitive_verbs: numbered("vi", 8),
            transitive_verbs: numbered("vt", 8),
            adjectives: numbered("adj", 8),
            adverbs: numbered("adv", 4),
            prepositions: numbered("prep", 4),
            articles: numbered("art", 4),
        }
    }

    fn encoder() -> SentenceEncoder {
        SentenceEncoder::new(test_lists())
    }

    /// Widest possible sentence for `test_lists`: subject phrase with
    /// adjective (2+1+3+4), transitive branch with full object phrase
    /// (1+3+10), adverb (1+2) and preposition (1+2).
    const MAX_SENTENCE_BITS: usize = 30;

    #[test]
    fn all_zero_flags_yield_minimal_sentence() {
        // Article takes 2 bits, every flag reads 0: subject without
        // adjective, intransitive verb, no adverb, no preposition.
        let enc = encoder();
        let out = enc.encode_bits(&[0x00, 0x00], 1).unwrap();
        assert_eq!(out, "art0 noun0 vi0\n");
    }

    #[test]
    fn single_entry_lists_consume_only_choice_and_flag_bits() {
        // Single-entry noun/verb lists consume zero bits; the whole
        // sentence costs article (1 bit) + three flag bits + adjective
        // flag = 5 bits of the 8 supplied.
        let lists = GrammarLists {
            nouns: numbered("noun", 1),
            intransitive_verbs: numbered("vi", 1),
            transitive_verbs: numbered("vt", 1),
            adjectives: numbered("adj", 1),
            adverbs: numbered("adv", 1),
            prepositions: numbered("prep", 1),
            articles: numbered("art", 2),
        };
        let enc = SentenceEncoder::new(lists);
        let out = enc.encode_bits(&[0x00], 1).unwrap();
        assert_eq!(out, "art0 noun0 vi0\n");
    }

    #[test]
    fn all_one_flags_yield_maximal_sentence() {
        // All-ones input sets every flag and selects the top reachable
        // index of every list.
        let enc = encoder();
        let out = enc.encode_bits(&[0xFF; 4], 1).unwrap();
        assert_eq!(
            out,
            "art3 adj7 noun15 vt7 art3 adj7 noun15 adv3 prep3\n"
        );
    }

    #[test]
    fn zero_bit_target_still_emits_one_sentence() {
        let enc = encoder();
        let out = enc.encode_bits(&[0x5A, 0x5A, 0x5A], 0).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn encoding_is_deterministic() {
        let enc = encoder();
        let digest = [0x9Eu8; 20];
        assert_eq!(
            enc.encode(&digest, 10).unwrap(),
            enc.encode(&digest, 10).unwrap()
        );
    }

    #[test]
    fn sentences_are_newline_terminated_without_stray_spaces() {
        let enc = encoder();
        let out = enc.encode(&[0xB6; 20], 10).unwrap();
        assert!(out.ends_with('\n'));
        for line in out.lines() {
            assert!(!line.is_empty());
            assert!(!line.starts_with(' '));
            assert!(!line.ends_with(' '));
            assert!(!line.contains("  "));
            let words = line.split(' ').count();
            // art noun vi .. art adj noun vt art adj noun adv prep
            assert!((3..=9).contains(&words), "odd sentence: {line:?}");
        }
    }

    #[test]
    fn consumed_bits_reach_target_and_last_sentence_crosses_it() {
        // Replay the grammar against the same bytes to recover the
        // per-sentence bit counts the encoder saw.
        let enc = encoder();
        let input = [0x6D, 0xF0, 0x13, 0x99, 0xAB, 0x42, 0xC7, 0x58];
        for target in [1usize, 8, 16, 24, 40] {
            let out = enc.encode_bits(&input, target).unwrap();

            // Each sentence starts only while the running total is still
            // short of the target, mirroring the encoder's loop.
            let mut reader = BitReader::new(&input);
            let mut total = 0;
            let mut sentences = 0;
            loop {
                let sentence = enc.sentence(&mut reader).unwrap();
                total += sentence.bits();
                sentences += 1;
                if total >= target {
                    break;
                }
            }
            assert!(total >= target, "target {target}");
            assert!(
                total < target + MAX_SENTENCE_BITS,
                "target {target}, total {total}"
            );
            assert_eq!(out.lines().count(), sentences, "target {target}");
        }
    }

    #[test]
    fn replayed_sentences_match_encoder_output() {
        let enc = encoder();
        let input = [0x21, 0x7C, 0xE5, 0x04, 0x8F, 0xD3];
        let out = enc.encode_bits(&input, 20).unwrap();

        let mut reader = BitReader::new(&input);
        let mut replay = String::new();
        let mut bits = 0;
        while bits < 20 {
            let sentence = enc.sentence(&mut reader).unwrap();
            bits += sentence.bits();
            replay.push_str(&sentence.text);
            replay.push('\n');
        }
        assert_eq!(out, replay);
    }

    #[test]
    fn exhausted_input_fails_with_end_of_stream() {
        let enc = encoder();
        // One byte cannot satisfy an 80-bit target.
        let err = enc.encode(&[0x00], 10).unwrap_err();
        assert!(matches!(err, CodecError::EndOfStream { .. }));
    }

    #[test]
    fn flag_bits_count_toward_entropy() {
        // The minimal sentence consumes 2 (article) + 4 (noun) + 3 (verb
        // choice) + 4 flag bits; a flag-free accounting would undercount.
        let enc = encoder();
        let mut reader = BitReader::new(&[0x00, 0x00]);
        let sentence = enc.sentence(&mut reader).unwrap();
        assert_eq!(sentence.bits(), 2 + 1 + 4 + 1 + 3 + 1 + 1);
        assert_eq!(sentence.bits(), reader.bit_position());
    }

    #[test]
    fn non_power_of_two_lists_stay_in_range() {
        // 3-entry article list indexes with 1 bit; entry 2 is unreachable
        // but indexing never goes out of bounds.
        let lists = GrammarLists {
            nouns: numbered("noun", 5),
            intransitive_verbs: numbered("vi", 3),
            transitive_verbs: numbered("vt", 3),
            adjectives: numbered("adj", 6),
            adverbs: numbered("adv", 3),
            prepositions: numbered("prep", 3),
            articles: numbered("art", 3),
        };
        let enc = SentenceEncoder::new(lists);
        let out = enc.encode_bits(&[0xFF; 8], 30).unwrap();
        assert!(out.contains("art1"));
        assert!(!out.contains("art2"));
    }

    #[tokio::test]
    async fn background_encode_matches_sync_encode() {
        let enc = encoder();
        let digest = vec![0x44u8; 20];
        let sync = enc.encode(&digest, 10).unwrap();
        let background = enc.encode_background(digest, 10).await.unwrap();
        assert_eq!(sync, background);
    }
}
