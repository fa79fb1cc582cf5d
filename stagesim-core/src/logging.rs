//! Structured logging for simulation runs
//!
//! The engine logs through `tracing`. Nothing is printed unless a subscriber
//! is installed, which the helpers below do.
//!
//! # Log levels
//!
//! - **TRACE**: every request movement (bus add, extraction, admission, service),
//!   plus the bus and queue dumps after each distribution and service pass
//! - **DEBUG**: one line per tick with bus depth and per-stage queue depths;
//!   drained requests at shutdown
//! - **INFO**: run start and completion with final totals
//! - **WARN**: requests lost at admission, queues reaching capacity
//!
//! # Environment control
//!
//! ```bash
//! RUST_LOG=debug cargo run --example three_generator_pipeline
//! RUST_LOG=stagesim_core::stage=trace cargo run --example three_generator_pipeline
//! ```
//!
//! `RUST_LOG` always wins over the level passed to the init functions.

use crate::request::StageNumber;
use crate::tick::Tick;
use tracing::{info, Span};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging at `info`.
pub fn init_simulation_logging() {
    init_simulation_logging_with_level("info")
}

/// Initialize logging with a specific level
///
/// # Arguments
/// * `level` - Log level: "trace", "debug", "info", "warn", or "error"
///
/// Installing a second global subscriber is ignored, so this can be called
/// from several tests.
pub fn init_simulation_logging_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("stagesim_core={level},stagesim_metrics={level},stagesim={level}").into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Simulation logging initialized at level: {}", level);
    }
}

/// Initialize pretty-printed logging with everything down to `trace`.
pub fn init_detailed_simulation_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stagesim_core=trace,stagesim_metrics=debug,stagesim=trace".into());

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_file(true)
                .with_line_number(true)
                .pretty(),
        )
        .with(filter)
        .try_init()
        .is_ok();

    if installed {
        info!("Detailed simulation logging initialized");
    }
}

/// Span covering a whole run
pub fn simulation_span(name: &str) -> Span {
    tracing::info_span!("simulation", name = name)
}

/// Span covering one stage's work within a tick
pub fn stage_span(stage: StageNumber) -> Span {
    tracing::debug_span!("stage", stage = stage)
}

/// Span covering one tick
pub fn tick_span(tick: Tick) -> Span {
    tracing::trace_span!("tick", tick = tick.as_u64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, trace};

    #[test]
    fn test_logging_initialization_is_repeatable() {
        init_simulation_logging_with_level("debug");
        init_simulation_logging();
        init_detailed_simulation_logging();

        info!("Test info message");
        debug!("Test debug message");
        trace!("Test trace message");
    }

    #[test]
    fn test_span_creation() {
        let _sim = simulation_span("test_simulation").entered();
        let _stage = stage_span(1);
        let _tick = tick_span(Tick::from_u64(3));
    }
}
