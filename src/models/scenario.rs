//! Scenario input bundle and assignment state.
//!
//! A scenario pairs an immutable [`ScenarioInput`] (what the optimizer
//! exported) with a [`ScenarioState`] (who is assigned to what). States are
//! values: engine runs and edits produce a new state instead of mutating
//! shared dictionaries, which is what keeps scenarios isolated.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{Assignment, CapacityMap, Task, WorkerId, WorkerSchedule};
use crate::projection;

/// Immutable per-scenario input from the optimizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Timed, prioritized tasks.
    pub tasks: Vec<Task>,
    /// Headcount per team/skill label.
    pub capacities: CapacityMap,
    /// Team → shift names. Never consumed by the engine; the workload
    /// report reads it for available crew time.
    #[serde(default)]
    pub shifts: BTreeMap<String, Vec<String>>,
}

impl ScenarioInput {
    /// Creates an input bundle without shift information.
    pub fn new(tasks: Vec<Task>, capacities: CapacityMap) -> Self {
        Self {
            tasks,
            capacities,
            shifts: BTreeMap::new(),
        }
    }

    /// Attaches the shift map.
    pub fn with_shifts(mut self, shifts: BTreeMap<String, Vec<String>>) -> Self {
        self.shifts = shifts;
        self
    }

    /// Finds a task by ID.
    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Task ID → task lookup table.
    pub fn task_index(&self) -> HashMap<&str, &Task> {
        self.tasks.iter().map(|t| (t.id.as_str(), t)).collect()
    }
}

/// Mutable assignment state of one scenario.
///
/// `worker_schedules` is always the projection of `assignments`; the only
/// way to change either is to build a new state through
/// [`ScenarioState::from_assignments`]. The state serializes for
/// reporting but never deserializes: stored records come back through
/// `persist::restore_state`, which re-projects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScenarioState {
    assignments: BTreeMap<String, Assignment>,
    worker_schedules: BTreeMap<WorkerId, WorkerSchedule>,
}

impl ScenarioState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from assignment records, deriving worker schedules.
    pub fn from_assignments(
        assignments: BTreeMap<String, Assignment>,
        input: &ScenarioInput,
    ) -> Self {
        let worker_schedules = projection::project(&assignments, input);
        Self {
            assignments,
            worker_schedules,
        }
    }

    /// Task ID → assignment record.
    pub fn assignments(&self) -> &BTreeMap<String, Assignment> {
        &self.assignments
    }

    /// Worker → chronological task list.
    pub fn worker_schedules(&self) -> &BTreeMap<WorkerId, WorkerSchedule> {
        &self.worker_schedules
    }

    /// Takes the records out, dropping the derived schedules.
    pub fn into_assignments(self) -> BTreeMap<String, Assignment> {
        self.assignments
    }

    /// Assignment for a task.
    pub fn assignment(&self, task_id: &str) -> Option<&Assignment> {
        self.assignments.get(task_id)
    }

    /// Schedule for a worker.
    pub fn schedule(&self, worker: &WorkerId) -> Option<&WorkerSchedule> {
        self.worker_schedules.get(worker)
    }

    /// Number of assignment records.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether no task has a record.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}
