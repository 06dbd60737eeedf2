//! Concurrent boundary bit set and its flush target
//!
//! During the parallel phase every worker marks node boundaries in a shared
//! [`AtomicBitSet`], a word-packed bit array with atomic single-bit sets.
//! Marking is commutative and idempotent, so `Relaxed` ordering suffices and
//! no broader locking is needed; the thread join before the flush is the only
//! synchronization barrier of the pass. After the join the marks are drained
//! once into a plain [`BoundaryBitVec`], the artifact handed downstream.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BitsetError;

const WORD_BITS: u64 = 64;

/// A lock-free bit set over `[0, len)` supporting concurrent single-bit sets
///
/// Sized up front for the full graph coordinate space; never grows. Reads
/// taken while writers are active see a subset of the final marks, which is
/// why the pass only drains it after all workers have joined.
pub struct AtomicBitSet {
    words: Vec<AtomicU64>,
    len: u64,
}

impl AtomicBitSet {
    /// Creates an empty bit set covering positions `0..len`
    #[must_use]
    pub fn new(len: u64) -> Self {
        let num_words = len.div_ceil(WORD_BITS) as usize;
        let mut words = Vec::with_capacity(num_words);
        words.resize_with(num_words, AtomicU64::default);
        Self { words, len }
    }

    /// Number of positions covered
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the bit at `pos`
    ///
    /// Idempotent: setting an already-set bit has no effect, so arbitrary
    /// interleavings of concurrent callers produce the same final set.
    pub fn set(&self, pos: u64) -> Result<(), BitsetError> {
        if pos >= self.len {
            return Err(BitsetError::OutOfRange(pos, self.len));
        }
        let word = (pos / WORD_BITS) as usize;
        let mask = 1u64 << (pos % WORD_BITS);
        self.words[word].fetch_or(mask, Ordering::Relaxed);
        Ok(())
    }

    /// Reads the bit at `pos`
    pub fn get(&self, pos: u64) -> Result<bool, BitsetError> {
        if pos >= self.len {
            return Err(BitsetError::OutOfRange(pos, self.len));
        }
        let word = (pos / WORD_BITS) as usize;
        let mask = 1u64 << (pos % WORD_BITS);
        Ok(self.words[word].load(Ordering::Relaxed) & mask != 0)
    }

    /// Iterates over the positions of all set bits, ascending
    pub fn iter_ones(&self) -> impl Iterator<Item = u64> + '_ {
        self.words.iter().enumerate().flat_map(|(i, word)| {
            let mut bits = word.load(Ordering::Relaxed);
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as u64;
                bits &= bits - 1;
                Some(i as u64 * WORD_BITS + tz)
            })
        })
    }

    /// Number of set bits
    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|w| u64::from(w.load(Ordering::Relaxed).count_ones()))
            .sum()
    }

    /// Drains every set bit into a fresh plain bit vector of the same length
    ///
    /// Strictly sequential; callers must ensure all writer activity has
    /// joined first.
    #[must_use]
    pub fn flush(&self) -> BoundaryBitVec {
        let mut out = BoundaryBitVec::new(self.len);
        for pos in self.iter_ones() {
            out.set(pos);
        }
        out
    }
}

/// A plain word-packed bit vector over graph coordinates
///
/// The sole artifact of the boundary-marking pass: bit `p` set means a graph
/// node boundary starts at coordinate `p`. Succinct/persistent storage of
/// this vector belongs to the downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryBitVec {
    words: Vec<u64>,
    len: u64,
}

impl BoundaryBitVec {
    /// Creates an all-zero bit vector covering positions `0..len`
    #[must_use]
    pub fn new(len: u64) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS) as usize],
            len,
        }
    }

    /// Number of positions covered
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sets the bit at `pos`
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    pub fn set(&mut self, pos: u64) {
        assert!(pos < self.len, "bit position {pos} out of range {}", self.len);
        self.words[(pos / WORD_BITS) as usize] |= 1u64 << (pos % WORD_BITS);
    }

    /// Reads the bit at `pos`
    ///
    /// # Panics
    ///
    /// Panics if `pos` is out of range.
    #[must_use]
    pub fn get(&self, pos: u64) -> bool {
        assert!(pos < self.len, "bit position {pos} out of range {}", self.len);
        self.words[(pos / WORD_BITS) as usize] & (1u64 << (pos % WORD_BITS)) != 0
    }

    /// Iterates over the positions of all set bits, ascending
    pub fn iter_ones(&self) -> impl Iterator<Item = u64> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut bits = word;
            std::iter::from_fn(move || {
                if bits == 0 {
                    return None;
                }
                let tz = bits.trailing_zeros() as u64;
                bits &= bits - 1;
                Some(i as u64 * WORD_BITS + tz)
            })
        })
    }

    /// Number of set bits
    #[must_use]
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|w| u64::from(w.count_ones())).sum()
    }

    /// The underlying little-endian word buffer
    #[must_use]
    pub fn as_words(&self) -> &[u64] {
        &self.words
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // ==================== AtomicBitSet Basic Tests ====================

    #[test]
    fn test_new_is_empty() {
        let bits = AtomicBitSet::new(100);
        assert_eq!(bits.len(), 100);
        assert_eq!(bits.count_ones(), 0);
        assert!(bits.iter_ones().next().is_none());
    }

    #[test]
    fn test_set_and_get() {
        let bits = AtomicBitSet::new(100);
        bits.set(0).unwrap();
        bits.set(63).unwrap();
        bits.set(64).unwrap();
        bits.set(99).unwrap();
        assert!(bits.get(0).unwrap());
        assert!(bits.get(63).unwrap());
        assert!(bits.get(64).unwrap());
        assert!(bits.get(99).unwrap());
        assert!(!bits.get(1).unwrap());
        assert_eq!(bits.count_ones(), 4);
    }

    #[test]
    fn test_set_is_idempotent() {
        let bits = AtomicBitSet::new(10);
        bits.set(3).unwrap();
        bits.set(3).unwrap();
        bits.set(3).unwrap();
        assert_eq!(bits.count_ones(), 1);
        assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_set_out_of_range() {
        let bits = AtomicBitSet::new(10);
        assert!(matches!(
            bits.set(10),
            Err(BitsetError::OutOfRange(10, 10))
        ));
        assert!(bits.get(10).is_err());
    }

    #[test]
    fn test_iter_ones_crosses_word_boundaries() {
        let bits = AtomicBitSet::new(200);
        for pos in [0, 1, 63, 64, 65, 127, 128, 199] {
            bits.set(pos).unwrap();
        }
        let ones: Vec<u64> = bits.iter_ones().collect();
        assert_eq!(ones, vec![0, 1, 63, 64, 65, 127, 128, 199]);
    }

    #[test]
    fn test_zero_length() {
        let bits = AtomicBitSet::new(0);
        assert!(bits.is_empty());
        assert!(bits.set(0).is_err());
    }

    // ==================== Concurrency Tests ====================

    #[test]
    fn test_concurrent_sets_lose_no_marks() {
        let bits = Arc::new(AtomicBitSet::new(4096));
        let mut handles = Vec::new();
        // Every thread sets every multiple of its stride; heavy collision on
        // the common multiples exercises the read-modify-write path.
        for stride in 1..=8u64 {
            let bits = bits.clone();
            handles.push(std::thread::spawn(move || {
                for pos in (0..4096).step_by(stride as usize) {
                    bits.set(pos).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        // Stride 1 alone covers every position
        assert_eq!(bits.count_ones(), 4096);
    }

    // ==================== Flush Tests ====================

    #[test]
    fn test_flush_preserves_all_marks() {
        let bits = AtomicBitSet::new(300);
        for pos in [0, 7, 64, 250, 299] {
            bits.set(pos).unwrap();
        }
        let bv = bits.flush();
        assert_eq!(bv.len(), 300);
        assert_eq!(bv.count_ones(), 5);
        for pos in [0, 7, 64, 250, 299] {
            assert!(bv.get(pos));
        }
        assert!(!bv.get(1));
    }

    // ==================== BoundaryBitVec Tests ====================

    #[test]
    fn test_bitvec_set_get_iter() {
        let mut bv = BoundaryBitVec::new(130);
        bv.set(0);
        bv.set(65);
        bv.set(129);
        assert_eq!(bv.iter_ones().collect::<Vec<_>>(), vec![0, 65, 129]);
        assert_eq!(bv.count_ones(), 3);
        assert_eq!(bv.as_words().len(), 3);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_bitvec_get_out_of_range_panics() {
        let bv = BoundaryBitVec::new(10);
        let _ = bv.get(10);
    }
}
