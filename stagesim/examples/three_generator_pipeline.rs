//! Three generators feeding one stage of three queues and two servers
//!
//! Prints the bus and every stage after each tick, then the final totals.
//!
//! Usage:
//! - Default scenario: cargo run --example three_generator_pipeline
//! - From a config file: cargo run --example three_generator_pipeline -- run.json
//! - Per-request logging: RUST_LOG=stagesim_core=debug cargo run --example three_generator_pipeline

use stagesim::core::{init_simulation_logging, simulation_span};
use stagesim::metrics::export_csv;
use stagesim::prelude::*;
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    init_simulation_logging();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::single_stage(3, 4, 2)
            .with_ticks(20)
            .with_generators(3),
    };
    let _run = simulation_span("three_generator_pipeline").entered();
    info!(?config, "Starting run");

    let mut sim = Simulation::new(config.clone())?;
    let mut series = TickSeries::default();

    Executor::from_config(&config)
        .side_effect(|s: &Simulation| {
            println!("Time: {}", s.time().as_u64());
            println!("{}", s.bus());
            for stage in s.stages() {
                if s.total_stages() > 1 {
                    println!("Stage {}:", stage.stage_number());
                }
                println!("{stage}");
            }
            println!();
            series.observe(s);
        })
        .execute(&mut sim);

    let report = SimulationReport::from_simulation(&sim);
    println!("{report}");
    info!(
        peak_bus_depth = series.peak_bus_depth(),
        smoothed_bus_depth = series.smoothed_bus_depth().unwrap_or(0.0),
        "Run finished"
    );

    if let Some(csv_path) = args.next() {
        export_csv(&series, &csv_path)?;
        info!(path = %csv_path, "Wrote tick series");
    }

    Ok(())
}
