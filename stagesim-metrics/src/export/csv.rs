//! CSV export
//!
//! Columns are `tick,bus_depth,created,processed,lost` followed by one
//! `stage_N_queued` column per stage.

use crate::error::MetricsError;
use crate::time_series::TickSeries;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV exporter for a tick series
#[derive(Debug)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn export(&self, series: &TickSeries) -> Result<(), MetricsError> {
        let file = File::create(&self.path).map_err(|e| {
            MetricsError::ExportError(format!("Failed to create {}: {e}", self.path.display()))
        })?;
        let mut out = BufWriter::new(file);

        write!(out, "tick,bus_depth,created,processed,lost")?;
        if let Some(first) = series.snapshots().first() {
            for stage in &first.stages {
                write!(out, ",stage_{}_queued", stage.stage)?;
            }
        }
        writeln!(out)?;

        for snapshot in series.snapshots() {
            write!(
                out,
                "{},{},{},{},{}",
                snapshot.tick.as_u64(),
                snapshot.bus_depth,
                snapshot.created,
                snapshot.processed,
                snapshot.lost
            )?;
            for stage in &snapshot.stages {
                write!(out, ",{}", stage.total_queued())?;
            }
            writeln!(out)?;
        }
        out.flush()?;

        debug!(path = %self.path.display(), rows = series.len(), "Exported CSV");
        Ok(())
    }
}
