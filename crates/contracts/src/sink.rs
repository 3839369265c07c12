//! DispatchSink - follower capture output interface
//!
//! Append-only destination for captured elements. Followers write
//! elements in the order they leave the queue.

use std::collections::VecDeque;

/// Append-only output
pub trait DispatchSink<D> {
    /// Append one captured element
    fn put(&mut self, element: D);
}

impl<D> DispatchSink<D> for Vec<D> {
    #[inline]
    fn put(&mut self, element: D) {
        self.push(element);
    }
}

impl<D> DispatchSink<D> for VecDeque<D> {
    #[inline]
    fn put(&mut self, element: D) {
        self.push_back(element);
    }
}

impl<D, S: DispatchSink<D> + ?Sized> DispatchSink<D> for &mut S {
    #[inline]
    fn put(&mut self, element: D) {
        (**self).put(element);
    }
}

/// Callback sink
///
/// ```
/// use contracts::{DispatchSink, SinkFn};
///
/// let mut seen = 0;
/// let mut sink = SinkFn(|_: u32| seen += 1);
/// sink.put(1);
/// sink.put(2);
/// drop(sink);
/// assert_eq!(seen, 2);
/// ```
pub struct SinkFn<F>(pub F);

impl<D, F: FnMut(D)> DispatchSink<D> for SinkFn<F> {
    #[inline]
    fn put(&mut self, element: D) {
        (self.0)(element);
    }
}
