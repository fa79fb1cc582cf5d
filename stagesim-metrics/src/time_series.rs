//! Per-tick observation of a running simulation
//!
//! A [`TickSeries`] is fed from the executor's side-effect hook and keeps one
//! [`TickSnapshot`] per tick, plus an exponential moving average of the bus
//! depth to show whether stranded requests are piling up.

use serde::{Deserialize, Serialize};
use stagesim_core::{Simulation, StageSnapshot, Tick};
use tracing::trace;

/// State of the whole network right after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: Tick,
    pub bus_depth: usize,
    pub stages: Vec<StageSnapshot>,
    pub created: u64,
    pub processed: u64,
    pub lost: u64,
}

impl TickSnapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let counters = sim.counters();
        Self {
            tick: sim.time(),
            bus_depth: sim.bus().len(),
            stages: sim.stage_snapshots(),
            created: counters.created(),
            processed: counters.processed(),
            lost: counters.lost(),
        }
    }

    /// Requests held in stage queues across all stages.
    pub fn total_queued(&self) -> usize {
        self.stages.iter().map(StageSnapshot::total_queued).sum()
    }
}

/// Exponential moving average calculator
#[derive(Debug, Clone)]
pub struct ExponentialMovingAverage {
    alpha: f64,
    current_value: Option<f64>,
}

impl ExponentialMovingAverage {
    /// Create a new EMA with the given smoothing factor (0 < alpha <= 1)
    /// Lower alpha = more smoothing, higher alpha = less smoothing
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "Alpha must be between 0 and 1");
        Self {
            alpha,
            current_value: None,
        }
    }

    /// Update the EMA with a new value
    pub fn update(&mut self, value: f64) -> f64 {
        let next = match self.current_value {
            None => value,
            Some(current) => self.alpha * value + (1.0 - self.alpha) * current,
        };
        self.current_value = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.current_value
    }
}

/// Collector of per-tick snapshots.
#[derive(Debug, Clone)]
pub struct TickSeries {
    snapshots: Vec<TickSnapshot>,
    bus_depth_ema: ExponentialMovingAverage,
}

impl Default for TickSeries {
    fn default() -> Self {
        Self::new(0.2)
    }
}

impl TickSeries {
    /// # Arguments
    /// * `ema_alpha` - Smoothing factor for the bus depth average (0 < alpha <= 1)
    pub fn new(ema_alpha: f64) -> Self {
        Self {
            snapshots: Vec::new(),
            bus_depth_ema: ExponentialMovingAverage::new(ema_alpha),
        }
    }

    /// Record the simulation's current state.
    pub fn observe(&mut self, sim: &Simulation) {
        self.push(TickSnapshot::capture(sim));
    }

    pub fn push(&mut self, snapshot: TickSnapshot) {
        let smoothed = self.bus_depth_ema.update(snapshot.bus_depth as f64);
        trace!(tick = %snapshot.tick, bus_depth = snapshot.bus_depth, smoothed, "Tick observed");
        self.snapshots.push(snapshot);
    }

    pub fn snapshots(&self) -> &[TickSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn last(&self) -> Option<&TickSnapshot> {
        self.snapshots.last()
    }

    /// Smoothed bus depth after the most recent observation.
    pub fn smoothed_bus_depth(&self) -> Option<f64> {
        self.bus_depth_ema.value()
    }

    /// Deepest the bus got over the observed ticks.
    pub fn peak_bus_depth(&self) -> usize {
        self.snapshots.iter().map(|s| s.bus_depth).max().unwrap_or(0)
    }

    /// Requests processed during each observed tick.
    ///
    /// A snapshot whose count is lower than its predecessor's contributes 0.
    pub fn processed_per_tick(&self) -> Vec<u64> {
        let mut previous = 0;
        self.snapshots
            .iter()
            .map(|s| {
                let delta = s.processed.saturating_sub(previous);
                previous = s.processed;
                delta
            })
            .collect()
    }
}
