//! State - readiness reported by followers to the captor

use serde::{Deserialize, Serialize};

/// Capture readiness signal
///
/// Shared by every follower policy. Policies with a constant contract
/// (e.g. AnyBefore) only ever report [`State::Primed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    /// Follower contributed to the group, the captor may proceed
    Primed,
    /// Not enough data yet, try again after more arrivals
    Retry,
    /// Data can never satisfy the current range, abort the attempt
    Abort,
    /// Queue monitor precondition failed, skip this frame
    SkipFrameQueuePrecondition,
}

impl State {
    #[inline]
    pub fn is_primed(self) -> bool {
        matches!(self, State::Primed)
    }
}
