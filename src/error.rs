use std::error::Error as StdError;

use crate::interval::OverlapRecord;

/// Custom Result type for graphseq operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the graphseq library, encompassing all possible error
/// cases that can occur during node boundary compaction.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Errors raised by the boundary-marking pass
    #[error("Error compacting nodes: {0}")]
    CompactError(#[from] CompactError),

    /// Errors related to the concurrent boundary bit set
    #[error("Error in boundary bit set: {0}")]
    BitsetError(#[from] BitsetError),

    /// Conversion errors from anyhow errors
    #[cfg(feature = "anyhow")]
    #[error("Generic error: {0}")]
    AnyhowError(#[from] anyhow::Error),

    /// Generic errors for other unexpected situations
    #[error("Generic error: {0}")]
    GenericError(#[from] Box<dyn StdError + Send + Sync>),
}
impl Error {
    /// Checks if the error is an alignment-index invariant violation
    ///
    /// This is the unrecoverable corruption case: a scanned input position
    /// mapped to zero or more than one graph position. Callers use this to
    /// distinguish corrupt upstream input from programming errors.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::CompactError(CompactError::AmbiguousOverlap { .. }))
    }
}

/// Errors raised while deriving node boundaries from the alignment index
///
/// There is exactly one fatal case: a scanned input position covered by a
/// number of overlap records other than one. It carries the full diagnostic
/// context so the caller can log every competing record before terminating.
#[derive(thiserror::Error, Debug)]
pub enum CompactError {
    /// A scanned position mapped to zero or multiple graph positions
    ///
    /// Each input base must map to exactly one place in the graph; anything
    /// else means the upstream alignment index is inconsistent and the whole
    /// pass is abandoned. No partial boundary set is produced.
    #[error(
        "found {n} overlaps for seq {seq_name} idx {ordinal} at j={position} of {scan_end}: {dump}",
        n = .records.len(),
        dump = format_records(.records)
    )]
    AmbiguousOverlap {
        /// Name of the sequence being scanned (diagnostics only)
        seq_name: String,
        /// 1-based ordinal of the sequence in the index
        ordinal: usize,
        /// The query-space position whose overlap count was not one
        position: u64,
        /// Exclusive end of the sequence's query-space span
        scan_end: u64,
        /// Every overlap record returned for the position
        records: Vec<OverlapRecord>,
    },
}

/// Errors related to the concurrent boundary bit set
#[derive(thiserror::Error, Debug)]
pub enum BitsetError {
    /// Attempted to mark a boundary outside the graph coordinate space
    ///
    /// The first parameter is the requested bit position, the second is the
    /// length of the bit set
    #[error("Bit position ({0}) is out of bit set range ({1})")]
    OutOfRange(u64, u64),
}

/// Renders the competing overlap records of an [`CompactError::AmbiguousOverlap`]
/// into a single diagnostic line.
fn format_records(records: &[OverlapRecord]) -> String {
    let parts: Vec<String> = records
        .iter()
        .map(|r| {
            format!(
                "(ovlp_start_in_q = {} ovlp_end_in_q = {} pos_start_in_s = {})",
                r.query_start, r.query_end, r.graph_pos
            )
        })
        .collect();
    parts.join(" ")
}

/// Trait for converting arbitrary errors into `Error`
pub trait IntoGraphseqError {
    fn into_graphseq_error(self) -> Error;
}

// Implement conversion for Box<dyn Error>
impl<E> IntoGraphseqError for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_graphseq_error(self) -> Error {
        Error::GenericError(Box::new(self))
    }
}
