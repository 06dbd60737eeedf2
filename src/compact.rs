//! Node boundary compaction over the graph base sequence
//!
//! Every position of every input sequence has been piecewise-aligned onto the
//! shared induced coordinate space upstream. This pass derives, from those
//! matched runs, the positions at which the coordinate space must be split
//! into discrete graph nodes: each run contributes a mark at its start-side
//! and end-side graph coordinates, with the arithmetic branching on the run's
//! orientation. Marks are unioned into a shared concurrent bit set; the final
//! bit vector is the partition consumed by the downstream node builder.

use crate::bitset::{AtomicBitSet, BoundaryBitVec};
use crate::error::{CompactError, Result};
use crate::interval::AlignmentIntervalIndex;
use crate::parallel::parallel_for;
use crate::pos::Orientation;
use crate::seqidx::SequenceIndex;
use crate::DEFAULT_CHUNK_SIZE;

/// Derives node boundary positions for a piecewise-aligned input corpus
///
/// Configured with the sequence index, the two interval indexes produced by
/// the alignment pass, the size of the graph base sequence, and a concurrency
/// degree. [`run`](NodeBoundaryCompactor::run) produces a bit vector of
/// length `graph_size + 1` in which a set bit at `p` means a node boundary
/// starts at graph coordinate `p`; bits 0 and `graph_size` are always set.
///
/// # Examples
///
/// ```
/// use graphseq::{
///     ConcatSequenceIndex, GraphPos, MemIntervalIndex, NodeBoundaryCompactor,
/// };
///
/// fn main() -> graphseq::Result<()> {
///     let mut seqidx = ConcatSequenceIndex::new();
///     seqidx.push("a", 4);
///
///     let mut path_index = MemIntervalIndex::new();
///     path_index.add(0, 4, GraphPos::new(0, false));
///     path_index.index();
///     let node_index = MemIntervalIndex::new();
///
///     let compactor =
///         NodeBoundaryCompactor::new(&seqidx, 4, &node_index, &path_index, 1);
///     let boundaries = compactor.run()?;
///     assert!(boundaries.get(0) && boundaries.get(4));
///     Ok(())
/// }
/// ```
pub struct NodeBoundaryCompactor<'a, S, I> {
    /// Resolves sequence ordinals to spans in the concatenated corpus
    seqidx: &'a S,
    /// Length of the graph base sequence
    graph_size: u64,
    /// Interval index over graph-node coordinates. Not queried by this pass;
    /// accepted alongside `path_index` for sibling validation stages.
    node_index: &'a I,
    /// Maps query-coordinate ranges to oriented graph positions
    path_index: &'a I,
    /// Concurrency degree: 1 is sequential, 0 means all available CPUs
    num_threads: usize,
    /// Ordinals claimed per scheduling step
    chunk_size: usize,
}

impl<'a, S, I> NodeBoundaryCompactor<'a, S, I>
where
    S: SequenceIndex + Sync,
    I: AlignmentIntervalIndex,
{
    #[must_use]
    pub fn new(
        seqidx: &'a S,
        graph_size: u64,
        node_index: &'a I,
        path_index: &'a I,
        num_threads: usize,
    ) -> Self {
        Self {
            seqidx,
            graph_size,
            node_index,
            path_index,
            num_threads,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Overrides the number of sequence ordinals claimed per scheduling step
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// The reserved graph-node interval index collaborator
    ///
    /// The boundary-marking pass itself never queries it.
    #[must_use]
    pub fn node_index(&self) -> &I {
        self.node_index
    }

    /// Runs the boundary-marking pass
    ///
    /// Scans every sequence (in parallel when the concurrency degree allows),
    /// marking the start-side and end-side graph coordinate of each matched
    /// run, then seals the set with the sentinel at `graph_size` and flushes
    /// it into the returned bit vector. Marking is idempotent and commutative
    /// across sequences, so any scheduling of the scan yields an identical
    /// result.
    ///
    /// # Errors
    ///
    /// Returns [`CompactError::AmbiguousOverlap`] if any scanned position is
    /// covered by zero or more than one overlap record. This means the
    /// upstream alignment index is inconsistent; the pass is abandoned and no
    /// boundary set is produced.
    pub fn run(&self) -> Result<BoundaryBitVec> {
        let marks = AtomicBitSet::new(self.graph_size + 1);
        // sequence start of the graph base sequence
        marks.set(0)?;

        let num_seqs = self.seqidx.count();
        parallel_for(1, num_seqs + 1, self.num_threads, self.chunk_size, |i| {
            self.scan_sequence(i, &marks)
        })?;

        // close the final node
        marks.set(self.graph_size)?;
        Ok(marks.flush())
    }

    /// Scans one sequence, marking both endpoints of every matched run
    ///
    /// The scan jumps by whole runs: each query at position `j` yields the
    /// run covering `j`, whose full extent is marked and skipped, so work is
    /// proportional to the number of runs rather than sequence length.
    fn scan_sequence(&self, ordinal: usize, marks: &AtomicBitSet) -> Result<()> {
        let mut j = self.seqidx.offset_of(ordinal);
        let k = j + self.seqidx.length_of(ordinal);
        while j < k {
            let records = self.path_index.overlaps_at(j);
            // each input base should only map one place in the graph
            if records.len() != 1 {
                return Err(CompactError::AmbiguousOverlap {
                    seq_name: self.seqidx.name_of(ordinal).to_string(),
                    ordinal,
                    position: j,
                    scan_end: k,
                    records,
                }
                .into());
            }
            let rec = records[0];
            debug_assert!(rec.query_start <= j && j < rec.query_end);

            let run_len = rec.len();
            let start = rec.graph_pos.offset();
            match rec.graph_pos.orientation() {
                Orientation::Forward => {
                    // node start, and the position right after the run's end
                    marks.set(start)?;
                    marks.set(start + run_len)?;
                }
                Orientation::Reverse => {
                    // read backward along the forward axis: the far endpoint
                    // sits run_len - 1 ahead of the anchor, and the low-side
                    // boundary one past the anchor
                    marks.set(start + run_len - 1)?;
                    marks.set(start + 1)?;
                }
            }
            j = rec.query_end;
        }
        Ok(())
    }
}
