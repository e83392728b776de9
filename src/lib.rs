//! Crew assignment engine for timed production tasks.
//!
//! Given a prioritized task list (each task needing N people of a team, or
//! of a team and skill) and a headcount per team/skill label, the engine
//! synthesizes the worker pool, staffs tasks greedily without double
//! booking anyone, and keeps a per-worker schedule view consistent with
//! the per-task assignment records.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `CapacityKey`, `Worker`,
//!   `Assignment`, `WorkerSchedule`, `ScenarioInput`, `ScenarioState`
//! - **`pool`**: Worker pool synthesis from capacities and a filter
//! - **`eligibility`**: Which worker may perform which task
//! - **`availability`**: Busy-until watermarks and seeded intervals during a run
//! - **`dispatching`**: Task ordering rules and rule engine
//! - **`allocator`**: Greedy engine, manual slot edits, run report, team workload
//! - **`projection`**: Assignment records → worker schedules
//! - **`store`**: Isolated, concurrently accessible scenarios
//! - **`persist`**: JSON export/restore of assignment records
//! - **`validation`**: Input and state integrity checks
//! - **`config`**: TOML engine configuration
//!
//! # Time
//!
//! All instants are `i64` milliseconds relative to an external epoch;
//! intervals are half-open `[start, end)`, so back-to-back tasks do not
//! conflict.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

pub mod allocator;
pub mod availability;
pub mod config;
pub mod dispatching;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod persist;
pub mod pool;
pub mod projection;
pub mod store;
pub mod validation;

pub use error::{AssignError, Result};
