//! Run-wide request accounting
//!
//! [`Counters`] is owned by a single [`Simulation`](crate::Simulation) and
//! handed to stages explicitly. Every increment is mirrored to the `metrics`
//! facade, so an installed recorder sees the same totals; with no recorder
//! installed the mirror is a no-op.

use metrics::counter;
use serde::{Deserialize, Serialize};

pub const CREATED_METRIC: &str = "stagesim_requests_created_total";
pub const PROCESSED_METRIC: &str = "stagesim_requests_processed_total";
pub const LOST_METRIC: &str = "stagesim_requests_lost_total";

/// Why a request was counted as lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LossReason {
    /// Every queue of the target stage was full at distribution time.
    Admission,
    /// The request was still on the bus or in a queue at shutdown.
    Drain,
}

impl LossReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            LossReason::Admission => "admission",
            LossReason::Drain => "drain",
        }
    }
}

/// Monotonic request totals for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    created: u64,
    processed: u64,
    lost_on_admission: u64,
    lost_at_drain: u64,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self) {
        self.created += 1;
        counter!(CREATED_METRIC).increment(1);
    }

    pub fn record_processed(&mut self) {
        self.processed += 1;
        counter!(PROCESSED_METRIC).increment(1);
    }

    pub fn record_lost(&mut self, reason: LossReason, count: u64) {
        if count == 0 {
            return;
        }
        match reason {
            LossReason::Admission => self.lost_on_admission += count,
            LossReason::Drain => self.lost_at_drain += count,
        }
        counter!(LOST_METRIC, "reason" => reason.as_str()).increment(count);
    }

    pub fn created(&self) -> u64 {
        self.created
    }

    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// All losses regardless of reason.
    pub fn lost(&self) -> u64 {
        self.lost_on_admission + self.lost_at_drain
    }

    pub fn lost_on_admission(&self) -> u64 {
        self.lost_on_admission
    }

    pub fn lost_at_drain(&self) -> u64 {
        self.lost_at_drain
    }

    /// Requests created but neither processed nor lost yet.
    pub fn outstanding(&self) -> u64 {
        self.created.saturating_sub(self.processed + self.lost())
    }
}
