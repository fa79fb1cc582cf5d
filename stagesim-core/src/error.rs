//! Error types for the simulation engine

use thiserror::Error;

/// Top-level error type for simulation setup and I/O
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected {expected} arrival sources, got {actual}")]
    ArrivalSourceCount { expected: usize, actual: usize },

    #[error("Stage {stage} is outside the pipeline (1..={total_stages})")]
    StageOutOfRange { stage: u32, total_stages: u32 },
}

/// Errors raised while validating a [`SimulationConfig`](crate::SimulationConfig)
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Simulation needs at least one stage")]
    NoStages,

    #[error("Field '{field}' must be {constraint}")]
    ConstraintViolation { field: String, constraint: String },

    #[error("Invalid value for field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Errors related to bounded queue operations
#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("Queue is full (capacity: {capacity})")]
    Full { capacity: usize },
}
