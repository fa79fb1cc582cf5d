//! Shared request buffer
//!
//! The [`RequestBus`] holds every request that is not currently owned by a
//! stage queue: fresh arrivals and requests a server has advanced to the next
//! stage. It is unbounded. Stages pull from it with a stable partition, so the
//! relative order of both the extracted and the remaining requests is kept.

use crate::request::{Request, StageNumber};
use std::collections::VecDeque;
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Default, Clone)]
pub struct RequestBus {
    requests: VecDeque<Request>,
}

impl RequestBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a request to the tail. Always succeeds.
    pub fn add(&mut self, request: Request) {
        trace!(request = %request, "Request added to bus");
        self.requests.push_back(request);
    }

    /// Remove and return, in arrival order, every request a stage may admit.
    ///
    /// A request matches when it is not low priority and targets
    /// `stage_number`. Low-priority requests never match any stage.
    pub fn extract_for_stage(&mut self, stage_number: StageNumber) -> Vec<Request> {
        let (matched, kept): (VecDeque<Request>, VecDeque<Request>) = self
            .requests
            .drain(..)
            .partition(|req| req.is_high_priority() && req.stage() == stage_number);
        self.requests = kept;

        trace!(
            stage = stage_number,
            extracted = matched.len(),
            remaining = self.requests.len(),
            "Extracted requests from bus"
        );
        matched.into()
    }

    /// Remove everything left on the bus and report how many were removed.
    pub fn drain_as_lost(&mut self) -> usize {
        let count = self.requests.len();
        for req in self.requests.drain(..) {
            debug!(request = %req, "Request lost on bus at shutdown");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Iterate the buffered requests head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &Request> {
        self.requests.iter()
    }
}

impl fmt::Display for RequestBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Requests in bus:")?;
        for req in &self.requests {
            write!(f, " {req}")?;
        }
        Ok(())
    }
}
