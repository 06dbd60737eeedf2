//! Overlap queries against the alignment interval index
//!
//! The alignment pass upstream produces, for every matched run of an input
//! sequence, the half-open query-space interval it covers and the oriented
//! graph position its first base is anchored to. The boundary-marking pass
//! consumes that mapping purely through stabbing queries, captured by the
//! [`AlignmentIntervalIndex`] trait. [`MemIntervalIndex`] is an in-memory
//! implementation with the same add / index / query lifecycle as the
//! mmap-backed production index.

use crate::pos::GraphPos;

/// The result of one alignment-index query
///
/// A matched run covering `[query_start, query_end)` of the concatenated
/// input corpus, whose first matched base sits at `graph_pos`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapRecord {
    /// Start of the matched run in query space (inclusive)
    pub query_start: u64,
    /// End of the matched run in query space (exclusive)
    pub query_end: u64,
    /// Oriented graph position of the base at `query_start`
    pub graph_pos: GraphPos,
}

impl OverlapRecord {
    #[must_use]
    pub fn new(query_start: u64, query_end: u64, graph_pos: GraphPos) -> Self {
        Self {
            query_start,
            query_end,
            graph_pos,
        }
    }

    /// Length of the matched run
    #[must_use]
    pub fn len(&self) -> u64 {
        self.query_end - self.query_start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query_end == self.query_start
    }
}

/// Overlap queries over query-coordinate intervals
///
/// Implementations must be shareable across the worker threads of the
/// boundary-marking pass, which only ever reads.
pub trait AlignmentIntervalIndex: Sync {
    /// Returns every record whose interval overlaps `[start, end)`
    fn overlaps(&self, start: u64, end: u64) -> Vec<OverlapRecord>;

    /// Returns every record covering the single position `point`
    fn overlaps_at(&self, point: u64) -> Vec<OverlapRecord> {
        self.overlaps(point, point + 1)
    }
}

/// An in-memory interval index over matched runs
///
/// Records are added in any order, then [`index`](MemIntervalIndex::index)
/// sorts them before the first query; querying an unindexed set is a
/// programmer error. Queries binary-search the sorted starts and walk back
/// no further than the longest interval can reach.
#[derive(Debug, Clone, Default)]
pub struct MemIntervalIndex {
    records: Vec<OverlapRecord>,
    /// Length of the longest interval, bounding the backward scan
    max_len: u64,
    indexed: bool,
}

impl MemIntervalIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a matched run mapping `[start, end)` in query space to `pos`
    pub fn add(&mut self, start: u64, end: u64, pos: GraphPos) {
        self.records.push(OverlapRecord::new(start, end, pos));
        self.max_len = self.max_len.max(end - start);
        self.indexed = false;
    }

    /// Sorts the records by interval start, enabling queries
    pub fn index(&mut self) {
        self.records
            .sort_unstable_by_key(|r| (r.query_start, r.query_end));
        self.indexed = true;
    }

    /// Number of records held
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl AlignmentIntervalIndex for MemIntervalIndex {
    /// # Panics
    ///
    /// Panics if called before [`index`](MemIntervalIndex::index).
    fn overlaps(&self, start: u64, end: u64) -> Vec<OverlapRecord> {
        assert!(self.indexed, "MemIntervalIndex queried before index()");
        // First record that starts at or beyond the query end; everything
        // overlapping must start before it.
        let upper = self
            .records
            .partition_point(|r| r.query_start < end);
        // No record starting earlier than max_len before the query start
        // can reach into it.
        let lower_bound = start.saturating_sub(self.max_len);
        let mut hits: Vec<OverlapRecord> = self.records[..upper]
            .iter()
            .rev()
            .take_while(|r| r.query_start >= lower_bound)
            .filter(|r| r.query_end > start)
            .copied()
            .collect();
        hits.reverse();
        hits
    }
}
