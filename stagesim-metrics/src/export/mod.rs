//! Export of run results
//!
//! JSON carries the final report together with every tick snapshot. CSV carries
//! the tick series only, one row per tick, for spreadsheets and pandas.

pub mod csv;
pub mod json;

use crate::error::MetricsError;
use crate::report::SimulationReport;
use crate::time_series::TickSeries;
use std::path::Path;

pub use self::csv::CsvExporter;
pub use self::json::JsonExporter;

/// Export a report and its tick series to a JSON file
///
/// # Example
/// ```no_run
/// use stagesim_core::{Execute, Executor, Simulation, SimulationConfig};
/// use stagesim_metrics::{export_json, SimulationReport, TickSeries};
///
/// let config = SimulationConfig::default().with_seed(1);
/// let mut sim = Simulation::new(config.clone()).unwrap();
/// let mut series = TickSeries::default();
/// Executor::from_config(&config)
///     .side_effect(|s: &Simulation| series.observe(s))
///     .execute(&mut sim);
///
/// let report = SimulationReport::from_simulation(&sim);
/// export_json(&report, &series, "results/run.json", true).unwrap();
/// ```
pub fn export_json(
    report: &SimulationReport,
    series: &TickSeries,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), MetricsError> {
    JsonExporter::new(path.as_ref(), pretty).export(report, series)
}

/// Export a tick series to a CSV file, one row per tick
pub fn export_csv(series: &TickSeries, path: impl AsRef<Path>) -> Result<(), MetricsError> {
    CsvExporter::new(path.as_ref()).export(series)
}
