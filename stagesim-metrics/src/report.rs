//! Final run report
//!
//! The two totals every run ends with, processed and lost, plus the breakdown
//! needed to interpret them.

use serde::{Deserialize, Serialize};
use stagesim_core::{Simulation, StageNumber};
use std::fmt;

/// Per-stage totals at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    pub stage: StageNumber,
    pub queues: usize,
    pub queue_capacity: usize,
    pub servers: usize,
    /// Requests taken off this stage's queues over the run
    pub served: u64,
    /// Requests lost at distribution because every queue was full
    pub rejected: u64,
    /// Requests served by each server, in server order
    pub served_by_server: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub ticks: u64,
    pub created: u64,
    pub processed: u64,
    pub lost: u64,
    pub lost_on_admission: u64,
    pub lost_at_drain: u64,
    /// Requests still on the bus or queued; zero once the run has drained
    pub in_flight: u64,
    /// Processed requests per tick
    pub throughput: f64,
    /// Fraction of created requests that were lost
    pub loss_ratio: f64,
    pub stages: Vec<StageReport>,
}

impl SimulationReport {
    pub fn from_simulation(sim: &Simulation) -> Self {
        let counters = sim.counters();
        let ticks = sim.time().as_u64();
        let created = counters.created();

        let stages = sim
            .stages()
            .iter()
            .map(|stage| {
                let capacity = stage.queues().first().map_or(0, |q| q.capacity());
                StageReport {
                    stage: stage.stage_number(),
                    queues: stage.queues().len(),
                    queue_capacity: capacity,
                    servers: stage.servers().len(),
                    served: stage.served_by_server().iter().sum(),
                    rejected: stage.rejected(),
                    served_by_server: stage.served_by_server().to_vec(),
                }
            })
            .collect();

        Self {
            ticks,
            created,
            processed: counters.processed(),
            lost: counters.lost(),
            lost_on_admission: counters.lost_on_admission(),
            lost_at_drain: counters.lost_at_drain(),
            in_flight: sim.in_flight() as u64,
            throughput: ratio(counters.processed(), ticks),
            loss_ratio: ratio(counters.lost(), created),
            stages,
        }
    }

    /// `created == processed + lost + in_flight`
    pub fn is_balanced(&self) -> bool {
        self.created == self.processed + self.lost + self.in_flight
    }
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lost requests: {}", self.lost)?;
        writeln!(f, "Processed requests: {}", self.processed)?;
        writeln!(
            f,
            "  created {} over {} ticks, lost {} at admission and {} at drain",
            self.created, self.ticks, self.lost_on_admission, self.lost_at_drain
        )?;
        for stage in &self.stages {
            writeln!(
                f,
                "  stage {}: {} served, {} rejected, per server {:?}",
                stage.stage, stage.served, stage.rejected, stage.served_by_server
            )?;
        }
        write!(
            f,
            "  throughput {:.3}/tick, loss ratio {:.3}",
            self.throughput, self.loss_ratio
        )
    }
}
