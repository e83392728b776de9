//! Error types for u-assign.
//!
//! Every condition here is locally recoverable. Under-capacity is not an
//! error at all: it surfaces as an `Unassignable` outcome in the run report.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for assignment operations.
#[derive(Debug, Error)]
pub enum AssignError {
    /// No scenario registered under this ID.
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    /// A manual edit named a task that is not in the scenario input.
    #[error("Unknown task: {0}")]
    UnknownTask(String),

    /// A manual edit targeted a slot at or beyond the required count.
    #[error("Invalid slot index {index} for task '{task_id}' (required {required})")]
    InvalidSlotIndex {
        task_id: String,
        index: usize,
        required: usize,
    },

    /// A worker ID string could not be parsed.
    #[error("Invalid worker id: {0}")]
    InvalidWorkerId(String),

    /// The worker already occupies another slot of the same task.
    #[error("Worker '{worker}' already occupies slot {slot} of task '{task_id}'")]
    DuplicateWorker {
        task_id: String,
        worker: String,
        slot: usize,
    },

    /// The worker is not constructible from the current capacities.
    #[error("Worker '{0}' does not exist under current capacities")]
    UnknownWorker(String),

    /// The worker may not perform the task.
    #[error("Worker '{worker}' is not eligible for task '{task_id}'")]
    IneligibleWorker { task_id: String, worker: String },

    /// The worker is already busy during the task's interval.
    #[error("Worker '{worker}' is busy with '{conflicting}' during task '{task_id}'")]
    WorkerConflict {
        task_id: String,
        worker: String,
        conflicting: String,
    },

    /// A scenario is already registered under this ID.
    #[error("Scenario already exists: {0}")]
    DuplicateScenario(String),

    /// Serialized assignment state could not be read or written.
    #[error("Persistence error: {0}")]
    Persistence(#[from] serde_json::Error),

    /// Engine configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for u-assign operations.
pub type Result<T> = std::result::Result<T, AssignError>;
