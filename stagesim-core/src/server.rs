//! Servers (channels)
//!
//! A [`Server`] is stateless: it takes the head of whichever queue it is handed
//! and decides the request's fate. It does not touch the bus or the counters;
//! the owning stage consumes the returned [`ServiceOutcome`].

use crate::queue::BoundedQueue;
use crate::request::{Request, StageNumber};
use tracing::trace;

/// Result of applying a server to a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// The queue was empty; nothing happened.
    Idle,
    /// The request moved on to the next stage and must go back onto the bus.
    Advanced(Request),
    /// The request finished its last stage.
    Completed(Request),
}

impl ServiceOutcome {
    /// Whether a request was taken off the queue.
    pub fn is_served(&self) -> bool {
        !matches!(self, ServiceOutcome::Idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Server {
    index: usize,
}

impl Server {
    pub fn new(index: usize) -> Self {
        Self { index }
    }

    /// Position of this server within its stage.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Serve the head of `queue`.
    ///
    /// A request below `total_stages` is advanced one stage; a request at
    /// `total_stages` is completed.
    pub fn service(&self, queue: &mut BoundedQueue, total_stages: StageNumber) -> ServiceOutcome {
        let Some(mut request) = queue.pop() else {
            return ServiceOutcome::Idle;
        };

        if request.stage() < total_stages {
            request.advance();
            trace!(server = self.index, request = %request, "Request advanced to next stage");
            ServiceOutcome::Advanced(request)
        } else {
            trace!(server = self.index, request = %request, "Request completed");
            ServiceOutcome::Completed(request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Priority, RequestId};

    #[test]
    fn test_idle_on_empty_queue() {
        let server = Server::new(0);
        let mut queue = BoundedQueue::new(2);
        assert_eq!(server.service(&mut queue, 1), ServiceOutcome::Idle);
        assert!(!ServiceOutcome::Idle.is_served());
    }

    #[test]
    fn test_advances_before_last_stage() {
        let server = Server::new(0);
        let mut queue = BoundedQueue::new(2);
        queue.try_enqueue(Request::new(RequestId(1), Priority::High, 1));

        match server.service(&mut queue, 3) {
            ServiceOutcome::Advanced(req) => {
                assert_eq!(req.id(), RequestId(1));
                assert_eq!(req.stage(), 2);
            }
            other => panic!("expected advance, got {other:?}"),
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_completes_at_last_stage() {
        let server = Server::new(1);
        let mut queue = BoundedQueue::new(2);
        queue.try_enqueue(Request::new(RequestId(9), Priority::High, 3));

        let outcome = server.service(&mut queue, 3);
        assert!(outcome.is_served());
        assert_eq!(
            outcome,
            ServiceOutcome::Completed(Request::new(RequestId(9), Priority::High, 3))
        );
    }

    #[test]
    fn test_serves_oldest_first() {
        let server = Server::new(0);
        let mut queue = BoundedQueue::new(3);
        queue.try_enqueue(Request::new(RequestId(1), Priority::High, 1));
        queue.try_enqueue(Request::new(RequestId(2), Priority::High, 1));

        let first = server.service(&mut queue, 1);
        assert!(matches!(first, ServiceOutcome::Completed(ref r) if r.id() == RequestId(1)));
        assert_eq!(queue.len(), 1);
    }
}
