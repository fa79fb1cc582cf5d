//! Request value types
//!
//! A [`Request`] is the unit of work flowing through the pipeline. Its identity
//! and priority class are fixed at creation; only its stage changes, and only
//! when a server advances it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a stage in the pipeline. The first stage is 1.
pub type StageNumber = u32;

/// The stage every freshly generated request targets.
pub const FIRST_STAGE: StageNumber = 1;

/// Unique, monotonically increasing request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// Priority class of a request.
///
/// Only `High` requests are ever extracted from the bus by a stage. `Low`
/// requests stay on the bus until the final drain counts them as lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    High,
}

impl Priority {
    /// Classify a uniform draw: strictly above `threshold` is `High`.
    pub fn from_draw(draw: f64, threshold: f64) -> Self {
        if draw > threshold {
            Priority::High
        } else {
            Priority::Low
        }
    }

    /// Numeric code used in diagnostic dumps (0 = low, 1 = high).
    pub fn code(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::High => 1,
        }
    }
}

/// A unit of work moving through the stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    id: RequestId,
    priority: Priority,
    stage: StageNumber,
}

impl Request {
    /// Create a request targeting `stage`.
    ///
    /// # Panics
    ///
    /// Panics if `stage` is 0; stages are numbered from 1.
    pub fn new(id: RequestId, priority: Priority, stage: StageNumber) -> Self {
        assert!(stage >= FIRST_STAGE, "stage numbers start at 1, got {stage}");
        Self { id, priority, stage }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// The stage this request is currently eligible for.
    pub fn stage(&self) -> StageNumber {
        self.stage
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == Priority::High
    }

    /// Move the request on to the following stage.
    pub(crate) fn advance(&mut self) {
        self.stage += 1;
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id.0, self.priority.code(), self.stage)
    }
}

/// Allocator for request identities.
///
/// Owned by the simulation so that identity sequences restart with every new
/// run. The first id handed out is 1.
#[derive(Debug, Default, Clone)]
pub struct RequestIdGen {
    last: u64,
}

impl RequestIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id.
    pub fn next_id(&mut self) -> RequestId {
        self.last += 1;
        RequestId(self.last)
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.last
    }
}
