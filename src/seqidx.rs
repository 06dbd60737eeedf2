//! Sequence index over the concatenated input corpus
//!
//! The boundary-marking pass only needs to resolve a sequence ordinal to its
//! byte span within the concatenated corpus, plus a name for diagnostics.
//! That contract is the [`SequenceIndex`] trait; the production rank/select
//! backed index lives upstream and implements it there.
//! [`ConcatSequenceIndex`] is a plain in-memory implementation for tests and
//! small inputs.

/// Resolves sequence ordinals to their span in the concatenated corpus
///
/// Ordinals are 1-based: valid ordinals are `1..=count()`. `name_of` is used
/// only when reporting an invariant violation.
pub trait SequenceIndex {
    /// Number of sequences in the corpus
    fn count(&self) -> usize;

    /// Start offset of the sequence in the concatenated coordinate space
    fn offset_of(&self, ordinal: usize) -> u64;

    /// Length of the sequence
    fn length_of(&self, ordinal: usize) -> u64;

    /// Name of the sequence (diagnostics only)
    fn name_of(&self, ordinal: usize) -> &str;
}

/// Per-sequence annotation within the concatenated corpus
#[derive(Debug, Clone)]
struct SeqSpan {
    /// Offset in the concatenated coordinate space
    offset: u64,
    /// Length of this sequence
    length: u64,
    /// Sequence name (e.g. "chr1", "sampleA#contig3")
    name: String,
}

/// An in-memory [`SequenceIndex`] built from (name, length) pairs
///
/// Offsets are assigned cumulatively in push order, matching the layout of a
/// corpus formed by concatenating the sequences back to back.
#[derive(Debug, Clone, Default)]
pub struct ConcatSequenceIndex {
    spans: Vec<SeqSpan>,
    total_length: u64,
}

impl ConcatSequenceIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sequence to the corpus, returning its 1-based ordinal
    pub fn push(&mut self, name: &str, length: u64) -> usize {
        self.spans.push(SeqSpan {
            offset: self.total_length,
            length,
            name: name.to_string(),
        });
        self.total_length += length;
        self.spans.len()
    }

    /// Total length of the concatenated corpus
    #[must_use]
    pub fn total_length(&self) -> u64 {
        self.total_length
    }
}

impl SequenceIndex for ConcatSequenceIndex {
    fn count(&self) -> usize {
        self.spans.len()
    }

    fn offset_of(&self, ordinal: usize) -> u64 {
        self.spans[ordinal - 1].offset
    }

    fn length_of(&self, ordinal: usize) -> u64 {
        self.spans[ordinal - 1].length
    }

    fn name_of(&self, ordinal: usize) -> &str {
        &self.spans[ordinal - 1].name
    }
}
