//! Multi-stage queueing network engine.
//!
//! Arrivals enter a shared [`RequestBus`], are distributed across per-stage
//! [`BoundedQueue`]s, and are drained by a limited pool of [`Server`]s. A
//! request served before the last stage goes back onto the bus one stage
//! further along; a request served at the last stage is complete. Requests that
//! no queue will admit, and anything left over when the run ends, are lost.
//!
//! # Architecture Overview
//!
//! - [`Simulation`]: owns the bus, the stages, the arrival sources and the
//!   [`Counters`]. One value per run; nothing is global.
//! - [`Stage`]: one pipeline position. Distribution is first-fit by queue index;
//!   service visits queues from the highest index down and stops after one
//!   request per server.
//! - [`Executor`]: runs a fixed number of ticks followed by the final drain.
//!
//! # Basic Usage
//!
//! ```rust
//! use stagesim_core::{Executor, Simulation, SimulationConfig, StageConfig};
//!
//! let config = SimulationConfig::pipeline(vec![
//!     StageConfig::new(3, 4, 2),
//!     StageConfig::new(2, 2, 1),
//! ])
//! .with_ticks(50)
//! .with_seed(7);
//!
//! let mut sim = Simulation::new(config.clone()).unwrap();
//! sim.execute(Executor::from_config(&config));
//!
//! let c = sim.counters();
//! assert_eq!(c.created(), c.processed() + c.lost());
//! ```
//!
//! # Time Model
//!
//! Time is a [`Tick`] count. Every tick runs generate → bus → (distribute,
//! service) per stage in pipeline order, synchronously and deterministically.

pub mod arrivals;
pub mod bus;
pub mod config;
pub mod counters;
pub mod error;
pub mod execute;
pub mod logging;
pub mod queue;
pub mod request;
pub mod server;
pub mod simulation;
pub mod stage;
pub mod tick;

pub use arrivals::{ArrivalSource, ScriptedArrivals, UniformArrivals, DEFAULT_LOW_PRIORITY_THRESHOLD};
pub use bus::RequestBus;
pub use config::{SimulationConfig, StageConfig};
pub use counters::{Counters, LossReason};
pub use error::{ConfigError, QueueError, SimError};
pub use execute::{Execute, Executor, ExecutorWithSideEffect};
pub use logging::{
    init_detailed_simulation_logging, init_simulation_logging, init_simulation_logging_with_level,
    simulation_span, stage_span, tick_span,
};
pub use queue::BoundedQueue;
pub use request::{Priority, Request, RequestId, RequestIdGen, StageNumber, FIRST_STAGE};
pub use server::{Server, ServiceOutcome};
pub use simulation::Simulation;
pub use stage::{Stage, StageSnapshot};
pub use tick::Tick;
