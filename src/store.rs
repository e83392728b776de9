//! Scenario store.
//!
//! Holds, per scenario ID, an immutable input bundle and the current
//! assignment state. Scenarios never share mutable data.
//!
//! # Concurrency
//!
//! - Registration takes a store-level `RwLock` write guard; lookups take a
//!   read guard only long enough to clone the entry `Arc`. No scenario lock
//!   is ever awaited while the store lock is held.
//! - Each scenario serializes its runs, edits and input replacement behind
//!   its own `Mutex`. An entry lives as long as its registration, so a
//!   writer that fetched the entry before a replacement still commits into
//!   the live scenario.
//! - States are copy-on-write: a new state is computed from the current one
//!   and swapped in only on success. Readers get an `Arc` snapshot that
//!   later writes never touch.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info};

use crate::allocator::{self, Allocator, RunReport, SlotEdit, WorkloadReport};
use crate::config::EngineConfig;
use crate::error::{AssignError, Result};
use crate::models::{ScenarioInput, ScenarioState, WorkerId};
use crate::persist;
use crate::pool::WorkerFilter;
use crate::validation::{self, ValidationError};

#[derive(Debug)]
struct Scenario {
    input: Arc<ScenarioInput>,
    state: Arc<ScenarioState>,
}

#[derive(Debug)]
struct ScenarioEntry {
    current: Mutex<Scenario>,
}

impl ScenarioEntry {
    fn new(input: ScenarioInput) -> Self {
        Self {
            current: Mutex::new(Scenario {
                input: Arc::new(input),
                state: Arc::new(ScenarioState::new()),
            }),
        }
    }
}

/// Registry of isolated scenarios.
///
/// # Example
///
/// ```
/// use u_assign::models::{CapacityMap, ScenarioInput, Task};
/// use u_assign::pool::WorkerFilter;
/// use u_assign::store::ScenarioStore;
///
/// let store = ScenarioStore::new();
/// store.insert("baseline", ScenarioInput::new(
///     vec![Task::new("T1", 0, 1_000).with_team("Mechanic Team 1")],
///     CapacityMap::new().with("Mechanic Team 1", 1),
/// )).unwrap();
///
/// let report = store.run("baseline", &WorkerFilter::All).unwrap();
/// assert_eq!(report.summary.full, 1);
/// assert_eq!(store.snapshot("baseline").unwrap().assignment_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ScenarioStore {
    allocator: Allocator,
    scenarios: RwLock<HashMap<String, Arc<ScenarioEntry>>>,
}

impl ScenarioStore {
    /// Creates an empty store with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine configuration used by runs and edits.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.allocator = self.allocator.with_config(config);
        self
    }

    /// Replaces the allocator.
    pub fn with_allocator(mut self, allocator: Allocator) -> Self {
        self.allocator = allocator;
        self
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        self.allocator.config()
    }

    /// Registers a scenario with an empty state.
    ///
    /// # Errors
    /// [`AssignError::DuplicateScenario`] if the ID is taken.
    pub fn insert(&self, id: impl Into<String>, input: ScenarioInput) -> Result<()> {
        let id = id.into();
        let mut scenarios = self.scenarios.write();
        if scenarios.contains_key(&id) {
            return Err(AssignError::DuplicateScenario(id));
        }
        info!(event = "scenario_insert", scenario = %id, tasks = input.tasks.len());
        scenarios.insert(id, Arc::new(ScenarioEntry::new(input)));
        Ok(())
    }

    /// Registers a scenario, or swaps the input of an existing one while
    /// keeping its records re-projected against the new input.
    pub fn replace(&self, id: impl Into<String>, input: ScenarioInput) {
        let id = id.into();
        let entry = {
            let mut scenarios = self.scenarios.write();
            match scenarios.get(&id) {
                Some(entry) => Arc::clone(entry),
                None => {
                    info!(event = "scenario_insert", scenario = %id, tasks = input.tasks.len());
                    scenarios.insert(id, Arc::new(ScenarioEntry::new(input)));
                    return;
                }
            }
        };

        let mut current = entry.current.lock();
        let state = ScenarioState::from_assignments(current.state.assignments().clone(), &input);
        info!(event = "scenario_replace", scenario = %id, tasks = input.tasks.len());
        *current = Scenario {
            input: Arc::new(input),
            state: Arc::new(state),
        };
    }

    /// Removes a scenario. Returns whether it existed.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.scenarios.write().remove(id).is_some();
        debug!(scenario = id, removed, "scenario removed");
        removed
    }

    /// Registered scenario IDs, sorted.
    pub fn scenario_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.scenarios.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Whether a scenario is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.scenarios.read().contains_key(id)
    }

    fn entry(&self, id: &str) -> Result<Arc<ScenarioEntry>> {
        self.scenarios
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| AssignError::UnknownScenario(id.to_string()))
    }

    /// The scenario's input bundle.
    pub fn input(&self, id: &str) -> Result<Arc<ScenarioInput>> {
        Ok(self.entry(id)?.current.lock().input.clone())
    }

    /// Current state snapshot.
    pub fn snapshot(&self, id: &str) -> Result<Arc<ScenarioState>> {
        Ok(self.entry(id)?.current.lock().state.clone())
    }

    /// Runs the engine over the tasks and workers admitted by `filter`.
    pub fn run(&self, id: &str, filter: &WorkerFilter) -> Result<RunReport> {
        let entry = self.entry(id)?;
        let mut current = entry.current.lock();
        let outcome = self
            .allocator
            .run_filtered(&current.state, &current.input, filter);
        info!(event = "scenario_run", scenario = id, message = %outcome.report.summary.message());
        current.state = Arc::new(outcome.state);
        Ok(outcome.report)
    }

    /// Sets or clears one slot. See [`allocator::set_slot`].
    pub fn set_slot(
        &self,
        id: &str,
        task_id: &str,
        slot: usize,
        worker: Option<WorkerId>,
    ) -> Result<SlotEdit> {
        let entry = self.entry(id)?;
        let mut current = entry.current.lock();
        let (next, edit) = allocator::set_slot(
            &current.state,
            &current.input,
            task_id,
            slot,
            worker,
            self.config().manual_edit_policy,
        )?;
        current.state = Arc::new(next);
        Ok(edit)
    }

    /// Removes one task's record. Returns whether it existed.
    pub fn clear_assignment(&self, id: &str, task_id: &str) -> Result<bool> {
        let entry = self.entry(id)?;
        let mut current = entry.current.lock();
        let (next, removed) = allocator::clear_assignment(&current.state, &current.input, task_id);
        current.state = Arc::new(next);
        Ok(removed)
    }

    /// Removes every record. Returns how many were removed.
    pub fn clear_all(&self, id: &str) -> Result<usize> {
        let entry = self.entry(id)?;
        let mut current = entry.current.lock();
        let (next, cleared) = allocator::clear_all(&current.state);
        current.state = Arc::new(next);
        Ok(cleared)
    }

    /// Exports the scenario's assignment records as JSON.
    pub fn export_assignments(&self, id: &str) -> Result<String> {
        let state = self.snapshot(id)?;
        persist::export_assignments(&state)
    }

    /// Replaces the scenario's state with exported records.
    ///
    /// On parse failure the current state is kept.
    pub fn restore(&self, id: &str, json: &str) -> Result<()> {
        let entry = self.entry(id)?;
        let mut current = entry.current.lock();
        let next = persist::restore_state(&current.input, json)?;
        info!(event = "scenario_restore", scenario = id, records = next.assignment_count());
        current.state = Arc::new(next);
        Ok(())
    }

    /// Per-team workload and utilization of the current state.
    pub fn workload(&self, id: &str) -> Result<WorkloadReport> {
        let entry = self.entry(id)?;
        let current = entry.current.lock();
        Ok(WorkloadReport::calculate(&current.input, &current.state))
    }

    /// Validates input and state together; all problems at once.
    pub fn validate(&self, id: &str) -> Result<Vec<ValidationError>> {
        let entry = self.entry(id)?;
        let (input, state) = {
            let current = entry.current.lock();
            (current.input.clone(), current.state.clone())
        };
        let mut problems = validation::validate_input(&input).err().unwrap_or_default();
        if let Err(errors) = validation::validate_state(&state, &input) {
            problems.extend(errors);
        }
        Ok(problems)
    }
}
