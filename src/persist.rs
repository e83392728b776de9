//! JSON persistence boundary.
//!
//! Only assignment records cross the boundary. Worker schedules are never
//! written; [`restore_state`] re-derives them from the records and the
//! scenario input, so a stored file cannot carry a stale per-worker view.
//!
//! ```
//! use u_assign::models::{CapacityMap, ScenarioInput, ScenarioState, Task};
//! use u_assign::persist::{export_assignments, restore_state};
//!
//! let input = ScenarioInput::new(
//!     vec![Task::new("T1", 0, 1_000).with_team("Mechanic Team 1")],
//!     CapacityMap::new().with("Mechanic Team 1", 1),
//! );
//! let json = export_assignments(&ScenarioState::new()).unwrap();
//! assert_eq!(json, "{}");
//! assert!(restore_state(&input, &json).unwrap().is_empty());
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Assignment, ScenarioInput, ScenarioState};

/// Serializes the assignment records of `state` (task ID → record).
pub fn export_assignments(state: &ScenarioState) -> Result<String> {
    Ok(serde_json::to_string(state.assignments())?)
}

/// Pretty-printed variant of [`export_assignments`].
pub fn export_assignments_pretty(state: &ScenarioState) -> Result<String> {
    Ok(serde_json::to_string_pretty(state.assignments())?)
}

/// Parses assignment records without projecting them.
pub fn import_assignments(json: &str) -> Result<BTreeMap<String, Assignment>> {
    Ok(serde_json::from_str(json)?)
}

/// Rebuilds a full state from exported records.
///
/// Stored records are normalized before projection: the record's task ID
/// follows its map key, slots are resized to the task's current slot count
/// and `partial` is recomputed. Records for tasks missing from `input` are
/// kept, but contribute nothing to worker schedules (see
/// `validation::validate_state`).
pub fn restore_state(input: &ScenarioInput, json: &str) -> Result<ScenarioState> {
    let mut assignments = import_assignments(json)?;
    let tasks = input.task_index();
    for (task_id, assignment) in assignments.iter_mut() {
        if assignment.task_id != *task_id {
            warn!(
                key = %task_id,
                record = %assignment.task_id,
                "record task id disagrees with key"
            );
            assignment.task_id = task_id.clone();
        }
        if let Some(task) = tasks.get(task_id.as_str()) {
            if assignment.slots.len() != task.slot_count() {
                debug!(
                    task_id = %task_id,
                    stored = assignment.slots.len(),
                    required = task.slot_count(),
                    "resizing restored record"
                );
                assignment.slots.resize(task.slot_count(), None);
            }
        }
        assignment.refresh();
    }
    debug!(records = assignments.len(), "assignments restored");
    Ok(ScenarioState::from_assignments(assignments, input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Allocator;
    use crate::error::AssignError;
    use crate::models::{CapacityMap, Task, WorkerId};
    use crate::pool::WorkerFilter;

    const HOUR: i64 = 3_600_000;

    fn input() -> ScenarioInput {
        ScenarioInput::new(
            vec![
                Task::new("T1", 0, HOUR).with_team("Mechanic Team 1").with_workers(2),
                Task::new("T2", HOUR, 2 * HOUR).with_team("Mechanic Team 1"),
                Task::new("Q1", 0, HOUR).with_team("Quality Team 1").with_workers(2),
            ],
            CapacityMap::new()
                .with("Mechanic Team 1", 2)
                .with("Quality Team 1", 1),
        )
    }

    #[test]
    fn test_round_trip_rederives_schedules() {
        let input = input();
        let run = Allocator::new().run_filtered(&ScenarioState::new(), &input, &WorkerFilter::All);

        let json = export_assignments(&run.state).unwrap();
        assert!(!json.contains("worker_schedules"));

        let restored = restore_state(&input, &json).unwrap();
        assert_eq!(restored, run.state);
        assert!(restored.assignment("Q1").unwrap().partial);
    }

    #[test]
    fn test_slot_encoding() {
        let input = input();
        let run = Allocator::new().run_filtered(&ScenarioState::new(), &input, &WorkerFilter::All);
        let json = export_assignments(&run.state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value["Q1"]["slots"],
            serde_json::json!(["Quality Team 1_1", ""])
        );
    }

    #[test]
    fn test_restore_against_changed_input() {
        let input = input();
        let run = Allocator::new().run_filtered(&ScenarioState::new(), &input, &WorkerFilter::All);
        let json = export_assignments_pretty(&run.state).unwrap();

        // Capacity shrinks and T2 disappears.
        let mut changed = input.clone();
        changed.tasks.retain(|t| t.id != "T2");
        changed.capacities = CapacityMap::new().with("Mechanic Team 1", 1);

        let restored = restore_state(&changed, &json).unwrap();
        assert!(restored.assignment("T2").is_some());
        let second: WorkerId = "Mechanic Team 1_2".parse().unwrap();
        let schedule = restored.schedule(&second).unwrap();
        assert!(!schedule.known);
        assert!(!schedule.contains("T2"));
    }

    #[test]
    fn test_restore_normalizes_stored_records() {
        let input = input();
        let json = r#"{
            "T1": {
                "task_id": "WRONG",
                "slots": ["Mechanic Team 1_1", ""],
                "snapshot": {"requirement": "Mechanic Team 1", "role": "standard"},
                "partial": false
            },
            "T2": {
                "task_id": "T2",
                "slots": ["Mechanic Team 1_2", "", ""],
                "snapshot": {"requirement": "Mechanic Team 1", "role": "standard"},
                "partial": true
            }
        }"#;

        let restored = restore_state(&input, json).unwrap();
        let t1 = restored.assignment("T1").unwrap();
        assert_eq!(t1.task_id, "T1");
        assert_eq!(t1.filled_slots(), 1);
        assert_eq!(t1.required_slots(), 2);
        assert!(t1.partial);

        let t2 = restored.assignment("T2").unwrap();
        assert_eq!(t2.required_slots(), 1);
        assert!(!t2.partial);
        assert!(crate::validation::validate_state(&restored, &input).is_ok());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            restore_state(&input(), "{not json"),
            Err(AssignError::Persistence(_))
        ));
        assert!(matches!(
            import_assignments(r#"{"T1": {"task_id": "T1", "slots": ["no-ordinal"]}}"#),
            Err(AssignError::Persistence(_))
        ));
    }
}
