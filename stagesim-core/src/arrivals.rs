//! Arrival sources
//!
//! An [`ArrivalSource`] is invoked once per tick and produces one new request
//! targeting the first stage. The engine only relies on the produced requests
//! having fresh ids from the shared [`RequestIdGen`].

use crate::request::{Priority, Request, RequestIdGen, FIRST_STAGE};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Draws at or below this value produce a low-priority request.
pub const DEFAULT_LOW_PRIORITY_THRESHOLD: f64 = 0.3;

/// Source of new requests, invoked once per tick.
pub trait ArrivalSource: Send {
    /// Produce the next request, taking its id from `ids`.
    fn generate(&mut self, ids: &mut RequestIdGen) -> Request;
}

/// Classifies each arrival by a uniform draw in `[0, 1)`.
///
/// A draw strictly above the threshold yields a high-priority request.
pub struct UniformArrivals {
    threshold: f64,
    rng: ChaCha8Rng,
    unit: Uniform<f64>,
}

impl UniformArrivals {
    /// Create a source seeded from OS entropy.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is outside `[0, 1]`.
    pub fn new(threshold: f64) -> Self {
        Self::from_rng(threshold, ChaCha8Rng::from_entropy())
    }

    /// Create a source with a deterministic RNG.
    pub fn with_seed(threshold: f64, seed: u64) -> Self {
        Self::from_rng(threshold, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(threshold: f64, rng: ChaCha8Rng) -> Self {
        assert!(
            (0.0..=1.0).contains(&threshold),
            "threshold must be between 0.0 and 1.0, got {threshold}"
        );
        Self {
            threshold,
            rng,
            unit: Uniform::new(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for UniformArrivals {
    fn default() -> Self {
        Self::new(DEFAULT_LOW_PRIORITY_THRESHOLD)
    }
}

impl ArrivalSource for UniformArrivals {
    fn generate(&mut self, ids: &mut RequestIdGen) -> Request {
        let draw = self.unit.sample(&mut self.rng);
        let priority = Priority::from_draw(draw, self.threshold);
        Request::new(ids.next_id(), priority, FIRST_STAGE)
    }
}

/// Replays a fixed cycle of priorities.
///
/// Useful when a run has to be exactly reproducible without reasoning about
/// RNG output.
#[derive(Debug, Clone)]
pub struct ScriptedArrivals {
    pattern: Vec<Priority>,
    position: usize,
}

impl ScriptedArrivals {
    /// # Panics
    ///
    /// Panics if `pattern` is empty.
    pub fn new(pattern: Vec<Priority>) -> Self {
        assert!(!pattern.is_empty(), "arrival pattern cannot be empty");
        Self { pattern, position: 0 }
    }

    /// A source that only ever produces high-priority requests.
    pub fn always_high() -> Self {
        Self::new(vec![Priority::High])
    }

    /// A source that only ever produces low-priority requests.
    pub fn always_low() -> Self {
        Self::new(vec![Priority::Low])
    }
}

impl ArrivalSource for ScriptedArrivals {
    fn generate(&mut self, ids: &mut RequestIdGen) -> Request {
        let priority = self.pattern[self.position];
        self.position = (self.position + 1) % self.pattern.len();
        Request::new(ids.next_id(), priority, FIRST_STAGE)
    }
}
