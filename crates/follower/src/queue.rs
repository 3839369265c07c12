//! Stamp-ordered dispatch queue.
//!
//! Uses index-based separation for better performance:
//! - HeapRb stores lightweight entries (stamp + slab key), kept sorted
//! - Slab stores the actual elements
//!
//! Reordering on out-of-order arrival only moves entries, never payloads.

use std::fmt;

use contracts::{DispatchQueue, StampOf, Stamped};
use ringbuf::{traits::*, HeapRb};
use slab::Slab;

/// Lightweight entry stored in the ring buffer
#[derive(Debug, Clone, Copy)]
struct Entry<S> {
    /// Stamp for ordering
    stamp: S,
    /// Key into the slab storage
    slab_key: usize,
}

/// Bounded queue ordered ascending by stamp
///
/// Equal stamps keep their arrival order. When full, the oldest of the
/// buffered elements and the incoming one is dropped.
pub struct StampQueue<D: Stamped> {
    /// Ring buffer of entries, ascending by stamp from the head
    index: HeapRb<Entry<StampOf<D>>>,
    /// Actual element storage
    storage: Slab<D>,
    /// Stamp of the last entry while the index is non-empty
    newest: Option<StampOf<D>>,
    capacity: usize,
    dropped_count: u64,
    out_of_order_count: u64,
}

impl<D: Stamped> fmt::Debug for StampQueue<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StampQueue")
            .field("len", &self.index.occupied_len())
            .field("capacity", &self.capacity)
            .field("oldest", &self.oldest_stamp())
            .field("newest", &self.newest_stamp())
            .field("dropped", &self.dropped_count)
            .finish()
    }
}

impl<D: Stamped> StampQueue<D> {
    /// Create a queue holding at most `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            index: HeapRb::new(capacity),
            storage: Slab::with_capacity(capacity),
            newest: None,
            capacity,
            dropped_count: 0,
            out_of_order_count: 0,
        }
    }

    /// Maximum number of buffered elements
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Peek at the oldest element without removing it
    #[inline]
    pub fn peek(&self) -> Option<&D> {
        self.index
            .iter()
            .next()
            .and_then(|entry| self.storage.get(entry.slab_key))
    }

    /// Buffered stamps, oldest first
    pub fn stamps(&self) -> impl Iterator<Item = StampOf<D>> + '_ {
        self.index.iter().map(|entry| entry.stamp)
    }

    /// Elements dropped because the queue was full
    ///
    /// Lifetime total; `clear` does not reset it.
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }

    /// Elements that arrived older than the newest buffered stamp
    ///
    /// Lifetime total; `clear` does not reset it.
    #[inline]
    pub fn out_of_order_count(&self) -> u64 {
        self.out_of_order_count
    }

    /// Place an entry at its sorted position, after any equal stamps
    fn insert_sorted(&mut self, entry: Entry<StampOf<D>>) {
        let mut entries: Vec<Entry<StampOf<D>>> = self.index.pop_iter().collect();
        let position = entries.partition_point(|e| e.stamp <= entry.stamp);
        entries.insert(position, entry);

        // Rebuild index (only moves small entries, not payloads)
        for e in entries {
            let _ = self.index.try_push(e);
        }
    }
}

impl<D: Stamped> DispatchQueue for StampQueue<D> {
    type Element = D;

    fn insert(&mut self, element: D) {
        let stamp = element.stamp();

        if self.index.is_full() {
            self.dropped_count += 1;

            // Incoming element is the oldest: drop it instead of a newer one
            if self.oldest_stamp().is_some_and(|oldest| stamp < oldest) {
                self.out_of_order_count += 1;
                return;
            }

            // Otherwise remove oldest entry from both index and storage
            if let Some(old) = self.index.try_pop() {
                self.storage.remove(old.slab_key);
            }
        }

        let entry = Entry {
            stamp,
            slab_key: self.storage.insert(element),
        };

        match self.newest_stamp() {
            Some(newest) if stamp < newest => {
                self.out_of_order_count += 1;
                self.insert_sorted(entry);
            }
            _ => {
                let _ = self.index.try_push(entry);
                self.newest = Some(stamp);
            }
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.occupied_len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    #[inline]
    fn oldest_stamp(&self) -> Option<StampOf<D>> {
        self.index.iter().next().map(|entry| entry.stamp)
    }

    #[inline]
    fn newest_stamp(&self) -> Option<StampOf<D>> {
        if self.index.is_empty() {
            None
        } else {
            self.newest
        }
    }

    #[inline]
    fn pop(&mut self) -> Option<D> {
        let entry = self.index.try_pop()?;
        Some(self.storage.remove(entry.slab_key))
    }

    /// Pops from the head only; entries are kept in stamp order
    fn remove_before(&mut self, stamp: StampOf<D>) -> usize {
        let mut removed = 0;

        while self.oldest_stamp().is_some_and(|oldest| oldest < stamp) {
            let Some(entry) = self.index.try_pop() else {
                break;
            };
            self.storage.remove(entry.slab_key);
            removed += 1;
        }

        removed
    }

    /// Drops every element; the lifetime counters are kept
    fn clear(&mut self) {
        while self.index.try_pop().is_some() {}
        self.storage.clear();
        self.newest = None;
    }
}
