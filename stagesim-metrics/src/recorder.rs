//! A `metrics::Recorder` that captures counters in memory.
//!
//! The engine mirrors every created, processed and lost request to a standard
//! `metrics` counter. Installing a local [`CounterRecorder`] around a run
//! collects those increments without touching the global recorder:
//!
//! ```rust
//! # use std::sync::{Arc, Mutex};
//! # use stagesim_metrics::{CounterStore, with_counter_recorder};
//! let store = Arc::new(Mutex::new(CounterStore::default()));
//! with_counter_recorder(&store, || {
//!     metrics::counter!("requests_total", "stage" => "1").increment(2);
//! });
//! assert_eq!(store.lock().unwrap().get("requests_total", &[("stage", "1")]), Some(2));
//! ```

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

type Labels = Vec<(String, String)>;

/// Counter values keyed by metric name and sorted label set.
#[derive(Debug, Default, Clone)]
pub struct CounterStore {
    counters: BTreeMap<(String, Labels), u64>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the counter with exactly these labels.
    pub fn get(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        let key = (name.to_string(), owned_labels(labels.iter().copied()));
        self.counters.get(&key).copied()
    }

    /// Sum over every label set recorded under `name`.
    pub fn total(&self, name: &str) -> u64 {
        self.counters
            .iter()
            .filter(|((n, _), _)| n == name)
            .map(|(_, v)| v)
            .sum()
    }

    pub fn increment(&mut self, name: &str, labels: &[(String, String)], value: u64) {
        *self
            .counters
            .entry((name.to_string(), labels.to_vec()))
            .or_insert(0) += value;
    }

    pub fn set_absolute(&mut self, name: &str, labels: &[(String, String)], value: u64) {
        self.counters
            .insert((name.to_string(), labels.to_vec()), value);
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(String, String)], u64)> {
        self.counters
            .iter()
            .map(|((name, labels), v)| (name.as_str(), labels.as_slice(), *v))
    }
}

fn owned_labels<'a>(labels: impl Iterator<Item = (&'a str, &'a str)>) -> Labels {
    let mut owned: Labels = labels.map(|(k, v)| (k.to_string(), v.to_string())).collect();
    owned.sort();
    owned
}

/// Recorder that forwards counter updates into a shared [`CounterStore`].
/// Gauges and histograms are accepted and discarded.
#[derive(Clone)]
pub struct CounterRecorder {
    store: Arc<Mutex<CounterStore>>,
}

impl CounterRecorder {
    pub fn new(store: Arc<Mutex<CounterStore>>) -> Self {
        Self { store }
    }
}

/// Run `f` with a [`CounterRecorder`] installed as the thread-local recorder.
pub fn with_counter_recorder<T>(store: &Arc<Mutex<CounterStore>>, f: impl FnOnce() -> T) -> T {
    let recorder = CounterRecorder::new(store.clone());
    metrics::with_local_recorder(&recorder, f)
}

struct CounterHandle {
    store: Arc<Mutex<CounterStore>>,
    name: String,
    labels: Labels,
}

impl metrics::CounterFn for CounterHandle {
    fn increment(&self, value: u64) {
        let mut store = self.store.lock().expect("CounterStore mutex poisoned");
        store.increment(&self.name, &self.labels, value);
    }

    fn absolute(&self, value: u64) {
        let mut store = self.store.lock().expect("CounterStore mutex poisoned");
        store.set_absolute(&self.name, &self.labels, value);
    }
}

impl Recorder for CounterRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        Counter::from_arc(Arc::new(CounterHandle {
            store: self.store.clone(),
            name: key.name().to_string(),
            labels: owned_labels(key.labels().map(|l| (l.key(), l.value()))),
        }))
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
