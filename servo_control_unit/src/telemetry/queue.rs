//! Bounded FIFO with drop-on-full insertion.
//!
//! Storage is a fixed `heapless::Deque<T, N>`; the usable capacity is set
//! at construction and may be smaller than `N`. A producer offering an item
//! to a full queue never blocks and never fails: the item is discarded and
//! counted.

use heapless::Deque;

/// Fixed-storage FIFO that discards new items when full.
#[derive(Debug)]
pub struct BoundedQueue<T, const N: usize> {
    items: Deque<T, N>,
    capacity: usize,
    dropped: u64,
}

impl<T, const N: usize> BoundedQueue<T, N> {
    /// Create a queue holding at most `capacity` items (clamped to `N`).
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Deque::new(),
            capacity: capacity.min(N),
            dropped: 0,
        }
    }

    /// Append `item` unless the queue is full.
    ///
    /// Returns `false` if the item was dropped.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            self.dropped += 1;
            return false;
        }
        match self.items.push_back(item) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Remove the oldest item.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Oldest item without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items discarded because the queue was full.
    #[inline]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Discard all queued items. The drop counter is kept.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
