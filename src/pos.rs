//! Oriented positions in the graph base sequence
//!
//! Every input base is anchored to a single offset in the induced graph
//! coordinate space, read either forward or reverse relative to the graph's
//! coordinate axis. Both pieces travel together through the alignment index,
//! so they are packed into a single `u64` with the orientation in the low bit.

use std::fmt;

/// Orientation of a matched run relative to the graph's forward coordinate axis
///
/// The node endpoint arithmetic differs between the two cases (the start and
/// end of a reverse match swap sides), so orientation is kept as an explicit
/// tagged variant rather than folded into a signed formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Forward,
    Reverse,
}

/// A position in the graph base sequence paired with an orientation flag
///
/// Packed representation: `offset << 1 | is_reverse`. Offsets are comparable
/// only within the same coordinate space; the packing supports offsets up to
/// `2^63 - 1`, enough for any concatenated input corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphPos(u64);

impl GraphPos {
    /// Creates an oriented graph position from an offset and a reverse flag
    #[must_use]
    pub fn new(offset: u64, is_reverse: bool) -> Self {
        Self(offset << 1 | u64::from(is_reverse))
    }

    /// The coordinate in the graph base sequence
    #[must_use]
    pub fn offset(self) -> u64 {
        self.0 >> 1
    }

    /// Whether the match reads reverse relative to the graph's forward axis
    #[must_use]
    pub fn is_reverse(self) -> bool {
        self.0 & 1 != 0
    }

    /// The orientation as a tagged variant for match-based endpoint arithmetic
    #[must_use]
    pub fn orientation(self) -> Orientation {
        if self.is_reverse() {
            Orientation::Reverse
        } else {
            Orientation::Forward
        }
    }
}

impl fmt::Display for GraphPos {
    /// Renders as `"{offset}{+|-}"`, the conventional strand notation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.offset(),
            if self.is_reverse() { '-' } else { '+' }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Packing Tests ====================

    #[test]
    fn test_forward_roundtrip() {
        let pos = GraphPos::new(1234, false);
        assert_eq!(pos.offset(), 1234);
        assert!(!pos.is_reverse());
        assert_eq!(pos.orientation(), Orientation::Forward);
    }

    #[test]
    fn test_reverse_roundtrip() {
        let pos = GraphPos::new(1234, true);
        assert_eq!(pos.offset(), 1234);
        assert!(pos.is_reverse());
        assert_eq!(pos.orientation(), Orientation::Reverse);
    }

    #[test]
    fn test_zero_offset() {
        assert_eq!(GraphPos::new(0, false).offset(), 0);
        assert_eq!(GraphPos::new(0, true).offset(), 0);
        assert!(GraphPos::new(0, true).is_reverse());
    }

    #[test]
    fn test_large_offset() {
        // Coordinate spaces can span billions of positions
        let offset = 3_100_000_000_u64;
        let pos = GraphPos::new(offset, true);
        assert_eq!(pos.offset(), offset);
        assert!(pos.is_reverse());
    }

    #[test]
    fn test_orientation_is_independent_of_offset() {
        assert_ne!(GraphPos::new(7, false), GraphPos::new(7, true));
        assert_ne!(GraphPos::new(7, false), GraphPos::new(8, false));
    }

    // ==================== Display Tests ====================

    #[test]
    fn test_display_forward() {
        assert_eq!(GraphPos::new(42, false).to_string(), "42+");
    }

    #[test]
    fn test_display_reverse() {
        assert_eq!(GraphPos::new(42, true).to_string(), "42-");
    }
}
