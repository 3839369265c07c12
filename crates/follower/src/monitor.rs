//! Queue occupancy monitors.

use std::fmt;

use contracts::{MonitorConfig, QueueMonitor, QueueSnapshot};

/// Monitor that observes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor;

impl<S> QueueMonitor<S> for NoopMonitor {
    #[inline]
    fn on_insert(&mut self, _snapshot: &QueueSnapshot<S>) {}
}

/// Depth tracking monitor with a backpressure threshold
///
/// Publishes the queue depth on every insertion and warns once each time the
/// depth reaches the configured high-water mark.
#[derive(Debug, Clone)]
pub struct OccupancyMonitor {
    follower_id: String,
    high_watermark: Option<usize>,
    peak_len: usize,
    above_watermark: bool,
    crossings: u64,
}

impl OccupancyMonitor {
    pub fn new(follower_id: impl Into<String>, high_watermark: Option<usize>) -> Self {
        Self {
            follower_id: follower_id.into(),
            high_watermark,
            peak_len: 0,
            above_watermark: false,
            crossings: 0,
        }
    }

    pub fn from_config(follower_id: impl Into<String>, config: &MonitorConfig) -> Self {
        Self::new(follower_id, config.high_watermark)
    }

    /// Largest depth seen so far
    #[inline]
    pub fn peak_len(&self) -> usize {
        self.peak_len
    }

    /// Number of times the high-water mark was reached from below
    #[inline]
    pub fn crossings(&self) -> u64 {
        self.crossings
    }

    /// Whether the last observed depth was at or above the high-water mark
    #[inline]
    pub fn is_above_watermark(&self) -> bool {
        self.above_watermark
    }
}

impl<S: fmt::Debug> QueueMonitor<S> for OccupancyMonitor {
    fn on_insert(&mut self, snapshot: &QueueSnapshot<S>) {
        self.peak_len = self.peak_len.max(snapshot.len);
        observability::record_queue_depth(&self.follower_id, snapshot.len);

        match self.high_watermark {
            Some(limit) if snapshot.len >= limit => {
                if !self.above_watermark {
                    self.above_watermark = true;
                    self.crossings += 1;
                    tracing::warn!(
                        follower = %self.follower_id,
                        depth = snapshot.len,
                        limit,
                        oldest = ?snapshot.oldest,
                        newest = ?snapshot.newest,
                        "follower queue reached high-water mark"
                    );
                    observability::record_high_watermark(&self.follower_id, snapshot.len);
                }
            }
            _ => self.above_watermark = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(len: usize) -> QueueSnapshot<u64> {
        QueueSnapshot {
            len,
            oldest: Some(0),
            newest: Some(len as u64),
        }
    }

    #[test]
    fn test_watermark_crossings_counted_once() {
        let mut monitor = OccupancyMonitor::new("imu", Some(3));

        for len in [1, 2, 3, 4, 5] {
            monitor.on_insert(&snapshot(len));
        }
        assert_eq!(monitor.crossings(), 1);
        assert!(monitor.is_above_watermark());

        // Drained below the mark, then filled again
        monitor.on_insert(&snapshot(1));
        assert!(!monitor.is_above_watermark());
        monitor.on_insert(&snapshot(3));
        assert_eq!(monitor.crossings(), 2);
        assert_eq!(monitor.peak_len(), 5);
    }

    #[test]
    fn test_no_watermark_never_crosses() {
        let mut monitor = OccupancyMonitor::from_config("gnss", &MonitorConfig::default());
        monitor.on_insert(&snapshot(10_000));
        assert_eq!(monitor.crossings(), 0);
        assert_eq!(monitor.peak_len(), 10_000);
    }
}
