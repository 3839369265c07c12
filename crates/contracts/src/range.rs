//! CaptureRange - driver output consumed by followers

use serde::{Deserialize, Serialize};

/// Stamp span attributed to one driving capture attempt.
///
/// `lower_stamp <= upper_stamp` is expected from the driver and is not
/// checked here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureRange<S> {
    /// Oldest driving stamp of the attempt
    pub lower_stamp: S,

    /// Newest driving stamp of the attempt
    pub upper_stamp: S,
}

impl<S: Copy + Ord> CaptureRange<S> {
    /// Create a range from its bounds
    #[inline]
    pub fn new(lower_stamp: S, upper_stamp: S) -> Self {
        Self {
            lower_stamp,
            upper_stamp,
        }
    }

    /// Degenerate range produced by a single driving element
    #[inline]
    pub fn point(stamp: S) -> Self {
        Self::new(stamp, stamp)
    }

    /// Inclusive membership test
    #[inline]
    pub fn contains(&self, stamp: S) -> bool {
        self.lower_stamp <= stamp && stamp <= self.upper_stamp
    }
}
