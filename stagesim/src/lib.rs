//! # stagesim - capacity-constrained multi-stage queueing network simulator
//!
//! Requests are generated every tick, wait on a shared bus, are admitted to
//! bounded per-stage queues and are served by a fixed number of servers per
//! stage. Whatever cannot be admitted, and whatever is still waiting when the
//! run ends, is counted as lost.
//!
//! ```rust
//! use stagesim::prelude::*;
//!
//! let config = SimulationConfig::single_stage(3, 4, 2).with_seed(42);
//! let mut sim = Simulation::new(config.clone()).unwrap();
//! let mut series = TickSeries::default();
//! Executor::from_config(&config)
//!     .side_effect(|s: &Simulation| series.observe(s))
//!     .execute(&mut sim);
//!
//! let report = SimulationReport::from_simulation(&sim);
//! assert_eq!(report.created, report.processed + report.lost);
//! assert_eq!(series.len(), 20);
//! ```
//!
//! See `examples/three_generator_pipeline.rs` for a runnable demo.

pub use stagesim_core as core;

pub use stagesim_metrics as metrics;

pub mod prelude {
    //! Commonly used types and traits

    pub use stagesim_core::{
        Counters, Execute, Executor, Priority, Request, SimError, Simulation, SimulationConfig,
        StageConfig, Tick,
    };

    pub use stagesim_metrics::{SimulationReport, TickSeries};
}
