//! End-to-end: run, observe every tick, capture counters, report and export.

use stagesim_core::counters::{CREATED_METRIC, PROCESSED_METRIC};
use stagesim_core::{Execute, Executor, Simulation, SimulationConfig, StageConfig};
use stagesim_metrics::{
    export_csv, export_json, with_counter_recorder, CounterStore, SimulationReport, TickSeries,
};
use std::fs;
use std::sync::{Arc, Mutex};

fn observed_run(config: SimulationConfig) -> (Simulation, TickSeries) {
    let mut sim = Simulation::new(config.clone()).unwrap();
    let mut series = TickSeries::default();
    Executor::from_config(&config)
        .side_effect(|s: &Simulation| series.observe(s))
        .execute(&mut sim);
    (sim, series)
}

#[test]
fn report_agrees_with_series_and_recorder() {
    let config = SimulationConfig::pipeline(vec![StageConfig::new(3, 4, 2), StageConfig::new(1, 2, 1)])
        .with_ticks(40)
        .with_seed(17);

    let store = Arc::new(Mutex::new(CounterStore::new()));
    let (sim, series) = with_counter_recorder(&store, || observed_run(config.clone()));
    let report = SimulationReport::from_simulation(&sim);

    assert!(report.is_balanced());
    assert_eq!(report.in_flight, 0);
    assert_eq!(report.created, 120);
    assert_eq!(report.stages.len(), 2);

    // The series stops before the drain, so its last processed count is final.
    let last = series.last().unwrap();
    assert_eq!(last.processed, report.processed);
    assert_eq!(last.created, report.created);
    assert_eq!(
        series.processed_per_tick().iter().sum::<u64>(),
        report.processed
    );

    let store = store.lock().unwrap();
    assert_eq!(store.total(CREATED_METRIC), report.created);
    assert_eq!(store.total(PROCESSED_METRIC), report.processed);
}

#[test]
fn export_json_and_csv_round_out_a_run() {
    let (sim, series) = observed_run(SimulationConfig::default().with_seed(8));
    let report = SimulationReport::from_simulation(&sim);

    let dir = std::env::temp_dir();
    let json_path = dir.join("stagesim_report_export_test.json");
    let csv_path = dir.join("stagesim_report_export_test.csv");

    export_json(&report, &series, &json_path, false).unwrap();
    export_csv(&series, &csv_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    let decoded: SimulationReport = serde_json::from_value(json["report"].clone()).unwrap();
    assert_eq!(decoded.created, report.created);
    assert_eq!(decoded.processed, report.processed);
    assert_eq!(decoded.lost, report.lost);
    assert_eq!(decoded.stages, report.stages);

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1 + 20);
    assert_eq!(csv.lines().next(), Some("tick,bus_depth,created,processed,lost,stage_1_queued"));

    fs::remove_file(&json_path).ok();
    fs::remove_file(&csv_path).ok();
}
