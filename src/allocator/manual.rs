//! Manual slot edits.
//!
//! A planner can place or clear a single worker in a single slot, or clear
//! whole records. Each edit returns a new state with schedules re-projected;
//! on error the caller's state is untouched.

use tracing::{debug, info};

use crate::config::ManualEditPolicy;
use crate::eligibility::is_eligible;
use crate::error::{AssignError, Result};
use crate::models::{Assignment, AssignmentStatus, ScenarioInput, ScenarioState, Worker, WorkerId};
use crate::pool::is_known_worker;

/// What a slot edit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEdit {
    /// Edited task.
    pub task_id: String,
    /// Edited slot index.
    pub slot: usize,
    /// Worker previously in the slot.
    pub previous: Option<WorkerId>,
    /// Worker now in the slot.
    pub current: Option<WorkerId>,
    /// Record status after the edit.
    pub status: AssignmentStatus,
}

/// Parses a slot value as sent by a planner: empty means "clear".
///
/// # Errors
/// [`AssignError::InvalidWorkerId`] when the value is not `"{label}_{n}"`.
pub fn parse_slot_value(value: &str) -> Result<Option<WorkerId>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| AssignError::InvalidWorkerId(value.to_string()))
}

/// Places `worker` into `slot` of `task_id` (or clears it with `None`).
///
/// A missing record is created as a stub first. A record whose slot count
/// disagrees with the task is resized. The worker may not already occupy a
/// different slot of the same task. Under [`ManualEditPolicy::Enforce`] the
/// worker must also exist, be eligible, and be free for the task interval.
pub fn set_slot(
    state: &ScenarioState,
    input: &ScenarioInput,
    task_id: &str,
    slot: usize,
    worker: Option<WorkerId>,
    policy: ManualEditPolicy,
) -> Result<(ScenarioState, SlotEdit)> {
    let task = input
        .task(task_id)
        .ok_or_else(|| AssignError::UnknownTask(task_id.to_string()))?;

    let mut assignment = state
        .assignment(task_id)
        .cloned()
        .unwrap_or_else(|| Assignment::stub(task));
    assignment.slots.resize(task.slot_count(), None);

    if slot >= assignment.slots.len() {
        return Err(AssignError::InvalidSlotIndex {
            task_id: task_id.to_string(),
            index: slot,
            required: assignment.slots.len(),
        });
    }

    if let Some(worker) = &worker {
        if let Some(existing) = assignment.slot_of(worker).filter(|&s| s != slot) {
            return Err(AssignError::DuplicateWorker {
                task_id: task_id.to_string(),
                worker: worker.to_string(),
                slot: existing,
            });
        }
        if policy == ManualEditPolicy::Enforce {
            enforce(state, input, task_id, worker)?;
        }
    }

    let previous = std::mem::replace(&mut assignment.slots[slot], worker.clone());
    assignment.refresh();
    let status = assignment.status();

    let mut assignments = state.assignments().clone();
    assignments.insert(task_id.to_string(), assignment);

    info!(
        event = "slot_edit",
        task_id,
        slot,
        previous = ?previous,
        current = ?worker,
    );

    Ok((
        ScenarioState::from_assignments(assignments, input),
        SlotEdit {
            task_id: task_id.to_string(),
            slot,
            previous,
            current: worker,
            status,
        },
    ))
}

fn enforce(
    state: &ScenarioState,
    input: &ScenarioInput,
    task_id: &str,
    worker: &WorkerId,
) -> Result<()> {
    if !is_known_worker(&input.capacities, worker) {
        return Err(AssignError::UnknownWorker(worker.to_string()));
    }
    let task = input
        .task(task_id)
        .ok_or_else(|| AssignError::UnknownTask(task_id.to_string()))?;
    if !is_eligible(task, &Worker::new(worker.key.clone(), worker.ordinal)) {
        return Err(AssignError::IneligibleWorker {
            task_id: task_id.to_string(),
            worker: worker.to_string(),
        });
    }
    if let Some(schedule) = state.schedule(worker) {
        let clash = schedule
            .tasks
            .iter()
            .find(|t| t.task_id != task_id && t.start_ms < task.end_ms && task.start_ms < t.end_ms);
        if let Some(clash) = clash {
            return Err(AssignError::WorkerConflict {
                task_id: task_id.to_string(),
                worker: worker.to_string(),
                conflicting: clash.task_id.clone(),
            });
        }
    }
    Ok(())
}

/// Removes the record of one task. Returns whether a record existed.
pub fn clear_assignment(
    state: &ScenarioState,
    input: &ScenarioInput,
    task_id: &str,
) -> (ScenarioState, bool) {
    let mut assignments = state.assignments().clone();
    let removed = assignments.remove(task_id).is_some();
    debug!(task_id, removed, "assignment cleared");
    (ScenarioState::from_assignments(assignments, input), removed)
}

/// Removes every record.
pub fn clear_all(state: &ScenarioState) -> (ScenarioState, usize) {
    let cleared = state.assignment_count();
    info!(event = "clear_all", cleared);
    (ScenarioState::new(), cleared)
}
