//! Stage orchestration
//!
//! A [`Stage`] owns a fixed set of bounded queues and servers for one position
//! in the pipeline. Each tick the driver calls, in this order:
//!
//! 1. [`Stage::distribute_to_queues`]: pull this stage's eligible requests off
//!    the bus and place each into the first queue with room (lowest index
//!    wins). A request no queue admits is lost.
//! 2. [`Stage::process_requests_in_phase`]: serve at most `K` requests, where
//!    `K` is the number of servers, visiting queues from the highest index
//!    down to 0.
//!
//! At shutdown [`Stage::drain_all_as_lost`] counts whatever is still queued as
//! lost.
//!
//! Both placement and service are deliberately unbalanced: low-index queues
//! fill first and high-index queues drain first.

use crate::bus::RequestBus;
use crate::counters::{Counters, LossReason};
use crate::queue::BoundedQueue;
use crate::request::StageNumber;
use crate::server::{Server, ServiceOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace, warn};

/// Queue depths of one stage at an instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub stage: StageNumber,
    pub queue_depths: Vec<usize>,
}

impl StageSnapshot {
    pub fn total_queued(&self) -> usize {
        self.queue_depths.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct Stage {
    stage_number: StageNumber,
    queues: Vec<BoundedQueue>,
    servers: Vec<Server>,
    /// Lifetime count of requests taken by each server
    served_by_server: Vec<u64>,
    /// Requests lost because every queue was full
    rejected: u64,
}

impl Stage {
    /// Build a stage with `num_queues` queues of `queue_capacity` each and
    /// `num_servers` servers. The shape is fixed for the stage's lifetime.
    pub fn new(
        stage_number: StageNumber,
        num_queues: usize,
        queue_capacity: usize,
        num_servers: usize,
    ) -> Self {
        Self {
            stage_number,
            queues: (0..num_queues).map(|_| BoundedQueue::new(queue_capacity)).collect(),
            servers: (0..num_servers).map(Server::new).collect(),
            served_by_server: vec![0; num_servers],
            rejected: 0,
        }
    }

    pub fn stage_number(&self) -> StageNumber {
        self.stage_number
    }

    pub fn queues(&self) -> &[BoundedQueue] {
        &self.queues
    }

    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Requests taken by each server since the stage was built.
    pub fn served_by_server(&self) -> &[u64] {
        &self.served_by_server
    }

    /// Requests this stage refused at distribution because all queues were full.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Requests currently held across all of this stage's queues.
    pub fn queued(&self) -> usize {
        self.queues.iter().map(BoundedQueue::len).sum()
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            stage: self.stage_number,
            queue_depths: self.queues.iter().map(BoundedQueue::len).collect(),
        }
    }

    /// Move this stage's eligible requests from the bus into its queues.
    ///
    /// Requests are placed in arrival order, each into the lowest-index queue
    /// that admits it. Returns how many were admitted.
    pub fn distribute_to_queues(&mut self, bus: &mut RequestBus, counters: &mut Counters) -> usize {
        let batch = bus.extract_for_stage(self.stage_number);
        let mut admitted = 0;

        for request in batch {
            let Some(index) = self.queues.iter().position(|q| !q.is_full()) else {
                warn!(
                    stage = self.stage_number,
                    request = %request,
                    "All queues are full, request lost"
                );
                counters.record_lost(LossReason::Admission, 1);
                self.rejected += 1;
                continue;
            };

            let accepted = self.queues[index].try_enqueue(request);
            debug_assert!(accepted, "queue {index} reported room but refused admission");
            trace!(stage = self.stage_number, queue = index, "Request admitted");
            admitted += 1;
        }

        admitted
    }

    /// Serve up to one request per server this tick.
    ///
    /// Queues are visited from the highest index down to 0. Each non-empty
    /// queue has the stage's servers applied to it in order until it empties
    /// or the per-tick cap is reached. Advanced requests go back onto the bus;
    /// completed ones are counted as processed. Returns the number served.
    pub fn process_requests_in_phase(
        &mut self,
        bus: &mut RequestBus,
        counters: &mut Counters,
        total_stages: StageNumber,
    ) -> usize {
        let cap = self.servers.len();
        let mut served = 0;

        for queue_index in (0..self.queues.len()).rev() {
            if served >= cap {
                break;
            }
            let queue = &mut self.queues[queue_index];
            if queue.is_empty() {
                continue;
            }

            for (server, served_count) in self.servers.iter().zip(self.served_by_server.iter_mut()) {
                if queue.is_empty() || served >= cap {
                    break;
                }
                match server.service(queue, total_stages) {
                    ServiceOutcome::Idle => {}
                    ServiceOutcome::Advanced(request) => {
                        bus.add(request);
                        served += 1;
                        *served_count += 1;
                    }
                    ServiceOutcome::Completed(request) => {
                        trace!(
                            stage = self.stage_number,
                            queue = queue_index,
                            request = %request,
                            "Processed request"
                        );
                        counters.record_processed();
                        served += 1;
                        *served_count += 1;
                    }
                }
            }
        }

        trace!(stage = self.stage_number, served, cap, "Service pass finished");
        served
    }

    /// Count every request still queued in this stage as lost.
    pub fn drain_all_as_lost(&mut self, counters: &mut Counters) -> usize {
        let drained: usize = self.queues.iter_mut().map(BoundedQueue::drain_as_lost).sum();
        if drained > 0 {
            debug!(stage = self.stage_number, drained, "Drained stage queues");
        }
        counters.record_lost(LossReason::Drain, drained as u64);
        drained
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, queue) in self.queues.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "Queue {}: {queue}", i + 1)?;
        }
        Ok(())
    }
}
