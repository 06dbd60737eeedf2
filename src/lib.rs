mod bitset;
mod compact;
mod error;
mod interval;
mod parallel;
mod pos;
mod seqidx;

pub use bitset::{AtomicBitSet, BoundaryBitVec};
pub use compact::NodeBoundaryCompactor;
pub use error::{BitsetError, CompactError, Error, IntoGraphseqError, Result};
pub use interval::{AlignmentIntervalIndex, MemIntervalIndex, OverlapRecord};
pub use parallel::parallel_for;
pub use pos::{GraphPos, Orientation};
pub use seqidx::{ConcatSequenceIndex, SequenceIndex};

/// Number of sequence ordinals claimed per scheduling step during the
/// parallel boundary-marking pass.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
