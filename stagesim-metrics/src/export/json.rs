//! JSON export

use crate::error::MetricsError;
use crate::report::SimulationReport;
use crate::time_series::{TickSeries, TickSnapshot};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON exporter for a finished run
#[derive(Debug)]
pub struct JsonExporter {
    path: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct ExportData<'a> {
    report: &'a SimulationReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    smoothed_bus_depth: Option<f64>,
    ticks: &'a [TickSnapshot],
}

impl JsonExporter {
    /// # Arguments
    /// * `path` - Output file path
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn new(path: &Path, pretty: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            pretty,
        }
    }

    pub fn export(&self, report: &SimulationReport, series: &TickSeries) -> Result<(), MetricsError> {
        let data = ExportData {
            report,
            smoothed_bus_depth: series.smoothed_bus_depth(),
            ticks: series.snapshots(),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&data)?
        } else {
            serde_json::to_string(&data)?
        };

        let mut file = File::create(&self.path).map_err(|e| {
            MetricsError::ExportError(format!("Failed to create {}: {e}", self.path.display()))
        })?;
        file.write_all(json.as_bytes())?;

        debug!(path = %self.path.display(), ticks = series.len(), "Exported JSON");
        Ok(())
    }
}
