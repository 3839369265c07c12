//! Follower capability set and the state shared by every follower policy.

use contracts::{
    CaptureRange, DispatchQueue, DispatchSink, QueueMonitor, QueueSnapshot, StampOf, Stamped,
    State,
};

const DEFAULT_FOLLOWER_ID: &str = "follower";

/// Operations a captor drives on each follower
///
/// Policy variants differ only in their selection predicate; the captor can
/// be generic over this trait.
pub trait Follower {
    type Element: Stamped;

    /// Follower ID (used for logging/metrics)
    fn id(&self) -> &str;

    /// Buffer a newly arrived element
    fn inject(&mut self, element: Self::Element);

    /// Move the elements belonging to `range` into `output`
    ///
    /// Elements are written oldest first.
    fn capture<O>(&mut self, output: O, range: &CaptureRange<StampOf<Self::Element>>) -> State
    where
        O: DispatchSink<Self::Element>;

    /// State `capture` would report, without touching the queue
    fn dry_capture(&self, range: &CaptureRange<StampOf<Self::Element>>) -> State;

    /// Drop data made stale by an aborted driving capture at `t_abort`
    fn abort(&mut self, t_abort: StampOf<Self::Element>);

    /// Drop everything buffered
    fn reset(&mut self);

    /// Number of buffered elements
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Oldest and newest buffered stamps
    fn available_range(&self) -> Option<CaptureRange<StampOf<Self::Element>>>;
}

/// Queue and monitor owned by a follower policy
#[derive(Debug)]
pub struct FollowerBase<Q, M> {
    id: String,
    queue: Q,
    monitor: M,
}

impl<Q, M> FollowerBase<Q, M>
where
    Q: DispatchQueue,
    M: QueueMonitor<StampOf<Q::Element>>,
{
    pub fn new(queue: Q, monitor: M) -> Self {
        Self {
            id: DEFAULT_FOLLOWER_ID.to_string(),
            queue,
            monitor,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    #[inline]
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    #[inline]
    pub(crate) fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    #[inline]
    pub fn monitor(&self) -> &M {
        &self.monitor
    }

    /// Insert into the queue and report the new occupancy to the monitor
    pub fn inject(&mut self, element: Q::Element) {
        self.queue.insert(element);
        let snapshot: QueueSnapshot<StampOf<Q::Element>> = QueueSnapshot::of(&self.queue);
        self.monitor.on_insert(&snapshot);
    }

    pub fn reset(&mut self) {
        self.queue.clear();
    }

    /// `None` when empty
    ///
    /// With an arrival-ordered queue fed out of order, `lower_stamp` may
    /// exceed `upper_stamp`.
    pub fn available_range(&self) -> Option<CaptureRange<StampOf<Q::Element>>> {
        Some(CaptureRange::new(
            self.queue.oldest_stamp()?,
            self.queue.newest_stamp()?,
        ))
    }
}
