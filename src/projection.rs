//! Schedule view projection.
//!
//! [`project`] regroups a scenario's assignment records by worker. It is
//! the only producer of [`WorkerSchedule`]s and runs after every mutation,
//! so the per-task and per-worker views cannot drift apart.
//!
//! - Records whose task is no longer in the input are skipped.
//! - Workers not constructible from current capacities still get a
//!   schedule, marked `known = false`.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::models::{Assignment, ScenarioInput, ScheduledTask, Task, Worker, WorkerId, WorkerSchedule};
use crate::pool::is_known_worker;

/// Derives every worker schedule from `assignments`.
pub fn project(
    assignments: &BTreeMap<String, Assignment>,
    input: &ScenarioInput,
) -> BTreeMap<WorkerId, WorkerSchedule> {
    let tasks: HashMap<&str, &Task> = input.task_index();
    let mut schedules: BTreeMap<WorkerId, WorkerSchedule> = BTreeMap::new();

    for (task_id, assignment) in assignments {
        let Some(task) = tasks.get(task_id.as_str()) else {
            debug!(task_id = %task_id, "dropping assignment for missing task");
            continue;
        };
        let entry = ScheduledTask::from_task(task);
        for worker_id in assignment.workers() {
            schedules
                .entry(worker_id.clone())
                .or_insert_with(|| empty_schedule(worker_id, input))
                .tasks
                .push(entry.clone());
        }
    }

    for schedule in schedules.values_mut() {
        schedule.sort();
    }
    schedules
}

fn empty_schedule(worker_id: &WorkerId, input: &ScenarioInput) -> WorkerSchedule {
    let known = is_known_worker(&input.capacities, worker_id);
    let worker = Worker::new(worker_id.key.clone(), worker_id.ordinal);
    WorkerSchedule {
        worker_id: worker_id.clone(),
        name: if known { worker.name } else { worker_id.to_string() },
        team: worker_id.key.team.clone(),
        skill: worker_id.key.skill.clone(),
        role: worker.role,
        known,
        tasks: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CapacityMap;

    const HOUR: i64 = 3_600_000;

    fn input() -> ScenarioInput {
        ScenarioInput::new(
            vec![
                Task::new("T1", 9 * HOUR, 10 * HOUR).with_team("Mechanic Team 1"),
                Task::new("T2", 8 * HOUR, 9 * HOUR).with_team("Mechanic Team 1"),
                Task::new("T3", 8 * HOUR, 12 * HOUR)
                    .with_team("Mechanic Team 1")
                    .with_workers(2),
            ],
            CapacityMap::new().with("Mechanic Team 1", 2),
        )
    }

    fn w(n: u32) -> WorkerId {
        WorkerId::from_label("Mechanic Team 1", n)
    }

    fn assignments(input: &ScenarioInput, rows: &[(&str, Vec<WorkerId>)]) -> BTreeMap<String, Assignment> {
        rows.iter()
            .map(|(id, workers)| {
                let task = input.task(id).unwrap();
                (id.to_string(), Assignment::with_workers(task, workers.clone()))
            })
            .collect()
    }

    #[test]
    fn test_grouped_and_sorted() {
        let input = input();
        let a = assignments(&input, &[("T1", vec![w(1)]), ("T2", vec![w(1)]), ("T3", vec![w(2)])]);
        let schedules = project(&a, &input);

        assert_eq!(schedules.len(), 2);
        let ids: Vec<&str> = schedules[&w(1)].tasks.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids, vec!["T2", "T1"]);
        assert_eq!(schedules[&w(2)].tasks[0].task_id, "T3");
        assert!(schedules[&w(1)].known);
    }

    #[test]
    fn test_view_matches_slots() {
        let input = input();
        let a = assignments(&input, &[("T3", vec![w(1), w(2)]), ("T1", vec![w(2)])]);
        let schedules = project(&a, &input);

        for (worker, schedule) in &schedules {
            for entry in &schedule.tasks {
                assert!(a[&entry.task_id].contains(worker));
            }
        }
        for (task_id, assignment) in &a {
            for worker in assignment.workers() {
                assert!(schedules[worker].contains(task_id));
            }
        }
    }

    #[test]
    fn test_missing_task_dropped() {
        let input = input();
        let mut a = assignments(&input, &[("T1", vec![w(1)])]);
        let ghost = Task::new("GONE", 0, HOUR).with_team("Mechanic Team 1");
        a.insert("GONE".into(), Assignment::with_workers(&ghost, vec![w(2)]));

        let schedules = project(&a, &input);
        assert!(!schedules.contains_key(&w(2)));
        assert_eq!(schedules[&w(1)].task_count(), 1);
    }

    #[test]
    fn test_unknown_worker_kept_and_flagged() {
        let input = input();
        let a = assignments(&input, &[("T1", vec![w(7)])]);
        let schedules = project(&a, &input);

        let s = &schedules[&w(7)];
        assert!(!s.known);
        assert_eq!(s.name, "Mechanic Team 1_7");
    }

    #[test]
    fn test_empty_slots_ignored() {
        let input = input();
        let task = input.task("T3").unwrap();
        let mut a = BTreeMap::new();
        a.insert("T3".to_string(), Assignment::stub(task));
        assert!(project(&a, &input).is_empty());
    }
}
