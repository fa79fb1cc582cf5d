//! Bounded per-stage queues
//!
//! A [`BoundedQueue`] is a fixed-capacity FIFO owned by one stage. Admission
//! never blocks: a full queue simply refuses the request and the caller is
//! responsible for accounting it as lost.

use crate::error::QueueError;
use crate::request::Request;
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace, warn};

/// Fixed-capacity FIFO queue of requests.
///
/// # Examples
///
/// ```
/// use stagesim_core::queue::BoundedQueue;
/// use stagesim_core::{Priority, Request, RequestId};
///
/// let mut queue = BoundedQueue::new(1);
/// assert!(queue.try_enqueue(Request::new(RequestId(1), Priority::High, 1)));
/// assert!(queue.is_full());
/// assert!(!queue.try_enqueue(Request::new(RequestId(2), Priority::High, 1)));
/// assert_eq!(queue.pop().map(|r| r.id()), Some(RequestId(1)));
/// ```
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    items: VecDeque<Request>,
    capacity: usize,
    /// Total number of requests ever admitted
    total_enqueued: u64,
    /// Total number of requests ever popped
    total_dequeued: u64,
    /// Total number of admissions refused because the queue was full
    total_rejected: u64,
}

impl BoundedQueue {
    /// Create an empty queue holding at most `capacity` requests.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            total_enqueued: 0,
            total_dequeued: 0,
            total_rejected: 0,
        }
    }

    /// Admit `request` if there is room.
    ///
    /// Returns `Err(QueueError::Full)` with the request dropped when the queue
    /// is at capacity.
    pub fn enqueue(&mut self, request: Request) -> Result<(), QueueError> {
        if self.is_full() {
            self.total_rejected += 1;
            trace!(request = %request, capacity = self.capacity, "Queue refused request");
            return Err(QueueError::Full {
                capacity: self.capacity,
            });
        }

        trace!(request = %request, depth = self.items.len() + 1, "Request enqueued");
        self.items.push_back(request);
        self.total_enqueued += 1;

        if self.is_full() {
            warn!(capacity = self.capacity, "Queue reached capacity");
        }
        Ok(())
    }

    /// Admit `request` if there is room and report whether it was admitted.
    pub fn try_enqueue(&mut self, request: Request) -> bool {
        self.enqueue(request).is_ok()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The oldest request, without removing it.
    pub fn peek(&self) -> Option<&Request> {
        self.items.front()
    }

    /// Remove and return the oldest request.
    pub fn pop(&mut self) -> Option<Request> {
        let item = self.items.pop_front();
        if item.is_some() {
            self.total_dequeued += 1;
        }
        item
    }

    /// Remove every remaining request and report how many were removed.
    pub fn drain_as_lost(&mut self) -> usize {
        let count = self.items.len();
        for req in self.items.drain(..) {
            debug!(request = %req, "Request lost in queue at shutdown");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Room left before the queue refuses admissions.
    pub fn free_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.items.len())
    }

    /// Current depth as a fraction of capacity.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        self.items.len() as f64 / self.capacity as f64
    }

    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.items.iter()
    }

    pub fn total_enqueued(&self) -> u64 {
        self.total_enqueued
    }

    pub fn total_dequeued(&self) -> u64 {
        self.total_dequeued
    }

    pub fn total_rejected(&self) -> u64 {
        self.total_rejected
    }
}

impl fmt::Display for BoundedQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for req in &self.items {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{req}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Priority, RequestId};

    fn high(id: u64) -> Request {
        Request::new(RequestId(id), Priority::High, 1)
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = BoundedQueue::new(4);
        for id in 1..=3 {
            assert!(queue.try_enqueue(high(id)));
        }
        assert_eq!(queue.peek().map(|r| r.id()), Some(RequestId(1)));
        assert_eq!(queue.pop().map(|r| r.id()), Some(RequestId(1)));
        assert_eq!(queue.pop().map(|r| r.id()), Some(RequestId(2)));
        assert_eq!(queue.pop().map(|r| r.id()), Some(RequestId(3)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_capacity_enforced() {
        let mut queue = BoundedQueue::new(2);
        assert!(!queue.is_full());
        queue.enqueue(high(1)).unwrap();
        queue.enqueue(high(2)).unwrap();
        assert!(queue.is_full());

        let result = queue.enqueue(high(3));
        assert_eq!(result, Err(QueueError::Full { capacity: 2 }));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.total_rejected(), 1);

        // Space frees up after a pop
        queue.pop();
        assert!(queue.try_enqueue(high(4)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_empty_access_returns_none() {
        let mut queue = BoundedQueue::new(3);
        assert!(queue.peek().is_none());
        assert!(queue.pop().is_none());
        assert_eq!(queue.total_dequeued(), 0);
    }

    #[test]
    fn test_drain_as_lost() {
        let mut queue = BoundedQueue::new(3);
        queue.try_enqueue(high(1));
        queue.try_enqueue(high(2));
        assert_eq!(queue.drain_as_lost(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.drain_as_lost(), 0);
    }

    #[test]
    fn test_counters_and_utilization() {
        let mut queue = BoundedQueue::new(4);
        assert_eq!(queue.utilization(), 0.0);
        assert_eq!(queue.free_capacity(), 4);

        queue.try_enqueue(high(1));
        queue.try_enqueue(high(2));
        assert_eq!(queue.utilization(), 0.5);
        assert_eq!(queue.free_capacity(), 2);

        queue.pop();
        assert_eq!(queue.total_enqueued(), 2);
        assert_eq!(queue.total_dequeued(), 1);
    }

    #[test]
    fn test_display() {
        let mut queue = BoundedQueue::new(2);
        queue.try_enqueue(high(1));
        queue.try_enqueue(Request::new(RequestId(2), Priority::High, 2));
        assert_eq!(queue.to_string(), "(1, 1, 1) (2, 1, 2)");
    }
}
