//! CaptureReport - per-call follower diagnostics

use serde::{Deserialize, Serialize};

/// Outcome of one capture pass, for metrics/diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReport {
    /// Elements written to the output sink
    pub emitted: usize,

    /// Elements dropped by the consistency pass after emission
    pub stale_removed: usize,

    /// Elements still buffered after the pass
    pub remaining: usize,
}
