//! AnyBefore follower policy.
//!
//! Captures every buffered element older than the driving range's upper
//! stamp shifted back by a fixed delay:
//!
//! ```text
//! boundary = range.upper_stamp - delay      (exclusive)
//!
//!   queue:    1    4  | 6    9
//!                     ^ boundary = 10 - 5
//!   output:   1    4
//! ```
//!
//! Anything at or after the boundary waits for a later capture, so the
//! policy never needs more data and always reports [`State::Primed`].

use contracts::{
    CaptureRange, CaptureReport, DispatchQueue, DispatchSink, FollowerConfig, OffsetOf,
    QueueMonitor, SimTime, Stamp, StampOf, Stamped, State,
};
use tracing::instrument;

use crate::{Follower, FollowerBase, NoopMonitor, OccupancyMonitor, StampQueue};

/// Follower capturing all elements before a delayed boundary
#[derive(Debug)]
pub struct AnyBefore<Q: DispatchQueue, M = NoopMonitor> {
    base: FollowerBase<Q, M>,
    delay: OffsetOf<Q::Element>,
    last_report: CaptureReport,
}

impl<Q, M> AnyBefore<Q, M>
where
    Q: DispatchQueue,
    M: QueueMonitor<StampOf<Q::Element>>,
{
    /// Create a follower owning `queue` and `monitor`
    ///
    /// `delay` is expected to be non-negative. With signed integer stamps a
    /// negative delay that overflows the boundary saturates at the stamp's
    /// maximum, see [`Stamp::checked_sub_offset`].
    pub fn new(delay: OffsetOf<Q::Element>, queue: Q, monitor: M) -> Self {
        Self {
            base: FollowerBase::new(queue, monitor),
            delay,
            last_report: CaptureReport::default(),
        }
    }

    /// Set the ID used in logs and metrics
    pub fn named(mut self, id: impl Into<String>) -> Self {
        self.base.set_id(id);
        self
    }

    #[inline]
    pub fn delay(&self) -> OffsetOf<Q::Element> {
        self.delay
    }

    /// Diagnostics of the most recent `capture`
    #[inline]
    pub fn last_report(&self) -> &CaptureReport {
        &self.last_report
    }

    #[inline]
    pub fn queue(&self) -> &Q {
        self.base.queue()
    }

    #[inline]
    pub fn monitor(&self) -> &M {
        self.base.monitor()
    }

    /// `stamp - delay`, or `None` if nothing can precede it
    #[inline]
    fn delayed(&self, stamp: StampOf<Q::Element>) -> Option<StampOf<Q::Element>> {
        stamp.checked_sub_offset(self.delay)
    }
}

impl<D> AnyBefore<StampQueue<D>, OccupancyMonitor>
where
    D: Stamped<Stamp = SimTime>,
{
    /// Build a simulation-time follower from its configuration
    pub fn from_config(config: &FollowerConfig) -> Self {
        Self::new(
            config.delay_s,
            StampQueue::with_capacity(config.queue.capacity),
            OccupancyMonitor::from_config(&config.id, &config.monitor),
        )
        .named(&config.id)
    }
}

impl<Q, M> Follower for AnyBefore<Q, M>
where
    Q: DispatchQueue,
    M: QueueMonitor<StampOf<Q::Element>>,
{
    type Element = Q::Element;

    #[inline]
    fn id(&self) -> &str {
        self.base.id()
    }

    #[inline]
    fn inject(&mut self, element: Q::Element) {
        self.base.inject(element);
    }

    #[instrument(
        level = "trace",
        name = "any_before_capture",
        skip(self, output, range),
        fields(follower = %self.base.id(), upper = ?range.upper_stamp)
    )]
    fn capture<O>(&mut self, mut output: O, range: &CaptureRange<StampOf<Q::Element>>) -> State
    where
        O: DispatchSink<Q::Element>,
    {
        let Some(boundary) = self.delayed(range.upper_stamp) else {
            self.last_report = CaptureReport {
                remaining: self.base.queue().len(),
                ..CaptureReport::default()
            };
            observability::record_capture(self.base.id(), &self.last_report);
            return State::Primed;
        };

        let queue = self.base.queue_mut();

        let mut emitted = 0;
        while let Some(oldest) = queue.oldest_stamp() {
            if oldest >= boundary {
                break;
            }
            match queue.pop() {
                Some(element) => {
                    output.put(element);
                    emitted += 1;
                }
                None => break,
            }
        }

        // Only non-zero when the queue does not keep strict stamp order
        let stale_removed = queue.remove_before(boundary);
        let remaining = queue.len();

        if stale_removed > 0 {
            tracing::warn!(
                follower = %self.base.id(),
                boundary = ?boundary,
                stale_removed,
                "out-of-order elements dropped behind capture boundary"
            );
        }

        self.last_report = CaptureReport {
            emitted,
            stale_removed,
            remaining,
        };
        observability::record_capture(self.base.id(), &self.last_report);

        tracing::trace!(
            boundary = ?boundary,
            emitted,
            remaining,
            "capture complete"
        );

        State::Primed
    }

    #[inline]
    fn dry_capture(&self, _range: &CaptureRange<StampOf<Q::Element>>) -> State {
        State::Primed
    }

    #[instrument(
        level = "trace",
        name = "any_before_abort",
        skip(self),
        fields(follower = %self.base.id())
    )]
    fn abort(&mut self, t_abort: StampOf<Q::Element>) {
        let removed = match self.delayed(t_abort) {
            Some(boundary) => self.base.queue_mut().remove_before(boundary),
            None => 0,
        };

        if removed > 0 {
            tracing::debug!(removed, "purged stale elements on abort");
        }
        observability::record_abort(self.base.id(), removed);
    }

    fn reset(&mut self) {
        self.base.reset();
        self.last_report = CaptureReport::default();
    }

    #[inline]
    fn len(&self) -> usize {
        self.base.queue().len()
    }

    #[inline]
    fn available_range(&self) -> Option<CaptureRange<StampOf<Q::Element>>> {
        self.base.available_range()
    }
}
