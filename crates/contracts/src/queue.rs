//! DispatchQueue / QueueMonitor - follower buffer interfaces
//!
//! Defines the capabilities a follower policy consumes from its buffer and
//! the observer notified when the buffer grows.

use std::collections::VecDeque;

use crate::{StampOf, Stamped};

/// Stamp-ordered buffer of dispatch elements
///
/// Elements are expected in ascending stamp order from the front; duplicate
/// stamps are allowed. Implementations that cannot guarantee strict ordering
/// must still make [`remove_before`](DispatchQueue::remove_before) remove every
/// element below the threshold.
pub trait DispatchQueue {
    type Element: Stamped;

    /// Insert an element
    fn insert(&mut self, element: Self::Element);

    /// Number of buffered elements
    fn len(&self) -> usize;

    /// Check if the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stamp of the element [`pop`](DispatchQueue::pop) would return
    fn oldest_stamp(&self) -> Option<StampOf<Self::Element>>;

    /// Stamp of the most recently ordered element
    fn newest_stamp(&self) -> Option<StampOf<Self::Element>>;

    /// Remove and return the oldest element
    fn pop(&mut self) -> Option<Self::Element>;

    /// Remove every element with stamp strictly less than `stamp`
    ///
    /// Returns the number of removed elements.
    fn remove_before(&mut self, stamp: StampOf<Self::Element>) -> usize;

    /// Remove all elements
    fn clear(&mut self);
}

/// Arrival-ordered queue
///
/// Trusts the feed to deliver elements in stamp order; an out-of-order
/// arrival stays where it landed. `remove_before` scans every element.
impl<D: Stamped> DispatchQueue for VecDeque<D> {
    type Element = D;

    #[inline]
    fn insert(&mut self, element: D) {
        self.push_back(element);
    }

    #[inline]
    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    #[inline]
    fn oldest_stamp(&self) -> Option<StampOf<D>> {
        self.front().map(Stamped::stamp)
    }

    #[inline]
    fn newest_stamp(&self) -> Option<StampOf<D>> {
        self.back().map(Stamped::stamp)
    }

    #[inline]
    fn pop(&mut self) -> Option<D> {
        self.pop_front()
    }

    fn remove_before(&mut self, stamp: StampOf<D>) -> usize {
        let before = VecDeque::len(self);
        self.retain(|element| element.stamp() >= stamp);
        before - VecDeque::len(self)
    }

    #[inline]
    fn clear(&mut self) {
        VecDeque::clear(self);
    }
}

/// Queue occupancy observed after an insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueSnapshot<S> {
    /// Buffered element count
    pub len: usize,

    /// Oldest buffered stamp
    pub oldest: Option<S>,

    /// Newest buffered stamp
    pub newest: Option<S>,
}

impl<S> QueueSnapshot<S> {
    /// Capture the occupancy of a queue
    pub fn of<Q>(queue: &Q) -> Self
    where
        Q: DispatchQueue,
        Q::Element: Stamped<Stamp = S>,
    {
        Self {
            len: queue.len(),
            oldest: queue.oldest_stamp(),
            newest: queue.newest_stamp(),
        }
    }
}

/// Queue occupancy observer (diagnostics / backpressure signaling)
pub trait QueueMonitor<S> {
    /// Called after every insertion into the monitored queue
    fn on_insert(&mut self, snapshot: &QueueSnapshot<S>);
}
