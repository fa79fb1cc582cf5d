//! Reports, time series and exporters for simulation runs
//!
//! This crate turns a finished [`Simulation`](stagesim_core::Simulation) into
//! a [`SimulationReport`], collects per-tick [`TickSnapshot`]s through the
//! executor's side-effect hook, captures the engine's `metrics` counters with
//! a local [`CounterRecorder`], and writes everything out as JSON or CSV.

pub mod error;
pub mod export;
pub mod recorder;
pub mod report;
pub mod time_series;

pub use error::MetricsError;
pub use export::{export_csv, export_json};
pub use recorder::{with_counter_recorder, CounterRecorder, CounterStore};
pub use report::{SimulationReport, StageReport};
pub use time_series::{ExponentialMovingAverage, TickSeries, TickSnapshot};
