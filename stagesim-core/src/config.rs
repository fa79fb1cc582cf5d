//! Run configuration
//!
//! A [`SimulationConfig`] fixes everything the driver needs for one run: how
//! many ticks, how many arrival sources, the priority threshold, an optional
//! seed, and the shape of each stage. Configurations can be built in code or
//! loaded from JSON, and are validated before a simulation is built.

use crate::arrivals::DEFAULT_LOW_PRIORITY_THRESHOLD;
use crate::error::{ConfigError, SimError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Validation result for configuration checks
pub type ValidationResult<T> = Result<T, ConfigError>;

/// Shape of one stage: queue count, per-queue capacity, server count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub queues: usize,
    pub queue_capacity: usize,
    pub servers: usize,
}

impl StageConfig {
    pub fn new(queues: usize, queue_capacity: usize, servers: usize) -> Self {
        Self {
            queues,
            queue_capacity,
            servers,
        }
    }

    fn validate(&self, index: usize) -> ValidationResult<()> {
        validate_positive(&format!("stages[{index}].queues"), self.queues)?;
        validate_positive(&format!("stages[{index}].queue_capacity"), self.queue_capacity)?;
        validate_positive(&format!("stages[{index}].servers"), self.servers)?;
        Ok(())
    }
}

impl Default for StageConfig {
    /// Three queues of four requests served by two servers.
    fn default() -> Self {
        Self::new(3, 4, 2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Ticks to run before the final drain
    pub ticks: u64,
    /// Arrival sources, each invoked once per tick
    pub generators: usize,
    /// Draws at or below this threshold yield low-priority requests
    pub low_priority_threshold: f64,
    /// Seed for reproducible arrivals; entropy when absent
    pub seed: Option<u64>,
    /// Stage shapes in pipeline order; stage numbers start at 1
    pub stages: Vec<StageConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 20,
            generators: 3,
            low_priority_threshold: DEFAULT_LOW_PRIORITY_THRESHOLD,
            seed: None,
            stages: vec![StageConfig::default()],
        }
    }
}

impl SimulationConfig {
    /// A one-stage configuration; requests never advance.
    pub fn single_stage(queues: usize, queue_capacity: usize, servers: usize) -> Self {
        Self::pipeline(vec![StageConfig::new(queues, queue_capacity, servers)])
    }

    /// A multi-stage configuration with default run parameters.
    pub fn pipeline(stages: Vec<StageConfig>) -> Self {
        Self {
            stages,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ticks(mut self, ticks: u64) -> Self {
        self.ticks = ticks;
        self
    }

    #[must_use]
    pub fn with_generators(mut self, generators: usize) -> Self {
        self.generators = generators;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.low_priority_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of stages in the pipeline.
    pub fn total_stages(&self) -> usize {
        self.stages.len()
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        if u32::try_from(self.stages.len()).is_err() {
            return Err(ConfigError::InvalidValue {
                field: "stages".to_string(),
                reason: format!("too many stages ({})", self.stages.len()),
            });
        }
        validate_positive("generators", self.generators)?;
        validate_range("low_priority_threshold", self.low_priority_threshold, 0.0, 1.0)?;
        for (index, stage) in self.stages.iter().enumerate() {
            stage.validate(index)?;
        }
        Ok(())
    }
}

/// Helper for validating numeric ranges
pub fn validate_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: T,
    min: T,
    max: T,
) -> ValidationResult<()> {
    // NaN compares false against both bounds, so test containment directly.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::ConstraintViolation {
            field: field.to_string(),
            constraint: format!("between {min} and {max}"),
        })
    }
}

/// Helper for validating that a value is positive
pub fn validate_positive<T: PartialOrd + Default + std::fmt::Display>(
    field: &str,
    value: T,
) -> ValidationResult<()> {
    if value <= T::default() {
        Err(ConfigError::ConstraintViolation {
            field: field.to_string(),
            constraint: "positive".to_string(),
        })
    } else {
        Ok(())
    }
}
