//! Per-worker schedule view.
//!
//! A [`WorkerSchedule`] lists the tasks a worker occupies a slot in,
//! sorted by start time. It is always derived from the assignment records
//! (see [`crate::projection`]) and never edited on its own.

use serde::{Deserialize, Serialize};

use super::{RoleClass, Task, WorkerId};

/// A committed task reference inside a worker schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Task ID.
    pub task_id: String,
    /// Start time (ms).
    pub start_ms: i64,
    /// End time (ms).
    pub end_ms: i64,
    /// Duration in minutes.
    pub duration_minutes: i64,
    /// Task type label.
    pub task_type: String,
    /// Product line.
    pub product: String,
}

impl ScheduledTask {
    /// Builds the reference from a task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            start_ms: task.start_ms,
            end_ms: task.end_ms,
            duration_minutes: task.duration_in_minutes(),
            task_type: task.task_type.clone(),
            product: task.product.clone(),
        }
    }

    /// Interval length (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Chronological task list for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSchedule {
    /// Worker identity.
    pub worker_id: WorkerId,
    /// Display label.
    pub name: String,
    /// Team name.
    pub team: String,
    /// Skill, if any.
    pub skill: Option<String>,
    /// Role-class.
    pub role: RoleClass,
    /// `false` when the id is not constructible from current capacities.
    pub known: bool,
    /// Tasks sorted by start time, then task ID.
    pub tasks: Vec<ScheduledTask>,
}

/// Two tasks in one worker schedule whose intervals overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleConflict {
    /// Earlier task.
    pub first: String,
    /// Later task.
    pub second: String,
    /// Overlap length (ms).
    pub overlap_ms: i64,
}

impl WorkerSchedule {
    /// Sorts tasks by start time, then task ID.
    pub fn sort(&mut self) {
        self.tasks.sort_by(|a, b| {
            a.start_ms
                .cmp(&b.start_ms)
                .then_with(|| a.task_id.cmp(&b.task_id))
        });
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the worker is scheduled on `task_id`.
    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.iter().any(|t| t.task_id == task_id)
    }

    /// Total busy time (ms).
    pub fn busy_ms(&self) -> i64 {
        self.tasks
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.duration_ms()))
    }

    /// End of the last task (ms), if any.
    pub fn last_end_ms(&self) -> Option<i64> {
        self.tasks.iter().map(|t| t.end_ms).max()
    }

    /// Adjacent-pair overlaps in the (sorted) task list.
    ///
    /// Manual overrides can produce these; engine runs never do.
    pub fn conflicts(&self) -> Vec<ScheduleConflict> {
        let mut conflicts = Vec::new();
        let mut latest: Option<&ScheduledTask> = None;
        for task in &self.tasks {
            if let Some(prev) = latest {
                if prev.end_ms > task.start_ms {
                    conflicts.push(ScheduleConflict {
                        first: prev.task_id.clone(),
                        second: task.task_id.clone(),
                        overlap_ms: prev.end_ms.min(task.end_ms).saturating_sub(task.start_ms),
                    });
                }
            }
            match latest {
                Some(p) if p.end_ms >= task.end_ms => {}
                _ => latest = Some(task),
            }
        }
        conflicts
    }

    /// Whether a new interval would overlap any task already listed.
    pub fn overlaps_interval(&self, start_ms: i64, end_ms: i64) -> bool {
        self.tasks
            .iter()
            .any(|t| t.start_ms < end_ms && start_ms < t.end_ms)
    }

    /// Tasks starting within `[from_ms, to_ms)`.
    pub fn tasks_between(&self, from_ms: i64, to_ms: i64) -> Vec<&ScheduledTask> {
        self.tasks
            .iter()
            .filter(|t| t.start_ms >= from_ms && t.start_ms < to_ms)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, start: i64, end: i64) -> ScheduledTask {
        ScheduledTask {
            task_id: id.to_string(),
            start_ms: start,
            end_ms: end,
            duration_minutes: (end - start) / 60_000,
            task_type: "Production".into(),
            product: "P".into(),
        }
    }

    fn sample(tasks: Vec<ScheduledTask>) -> WorkerSchedule {
        let mut s = WorkerSchedule {
            worker_id: WorkerId::from_label("Mechanic Team 1", 1),
            name: "Mechanic Team 1 Mechanic #1".into(),
            team: "Mechanic Team 1".into(),
            skill: None,
            role: RoleClass::Standard,
            known: true,
            tasks,
        };
        s.sort();
        s
    }

    #[test]
    fn test_sorted_by_start_then_id() {
        let s = sample(vec![entry("B", 100, 200), entry("C", 0, 50), entry("A", 100, 150)]);
        let ids: Vec<&str> = s.tasks.iter().map(|t| t.task_id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_busy_and_last_end() {
        let s = sample(vec![entry("A", 0, 100), entry("B", 200, 500)]);
        assert_eq!(s.busy_ms(), 400);
        assert_eq!(s.last_end_ms(), Some(500));
        assert_eq!(s.task_count(), 2);
        assert!(s.contains("B"));
        assert!(!s.contains("Z"));
    }

    #[test]
    fn test_extreme_intervals_saturate() {
        let mut wide = entry("A", 0, 0);
        wide.start_ms = i64::MIN;
        wide.end_ms = i64::MAX;
        let mut inner = entry("B", 0, 0);
        inner.start_ms = i64::MIN + 1;
        inner.end_ms = i64::MAX;
        let s = sample(vec![wide, inner]);

        assert_eq!(s.busy_ms(), i64::MAX);
        assert_eq!(s.conflicts()[0].overlap_ms, i64::MAX);
    }

    #[test]
    fn test_conflicts_detected() {
        let s = sample(vec![entry("A", 0, 100), entry("B", 50, 150), entry("C", 150, 200)]);
        let conflicts = s.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].first, "A");
        assert_eq!(conflicts[0].second, "B");
        assert_eq!(conflicts[0].overlap_ms, 50);
    }

    #[test]
    fn test_conflict_with_long_earlier_task() {
        // A covers both B and C.
        let s = sample(vec![entry("A", 0, 1000), entry("B", 100, 200), entry("C", 300, 400)]);
        assert_eq!(s.conflicts().len(), 2);
    }

    #[test]
    fn test_no_conflicts_when_touching() {
        let s = sample(vec![entry("A", 0, 100), entry("B", 100, 200)]);
        assert!(s.conflicts().is_empty());
        assert!(!s.overlaps_interval(200, 300));
        assert!(s.overlaps_interval(150, 250));
    }

    #[test]
    fn test_tasks_between() {
        let s = sample(vec![entry("A", 0, 100), entry("B", 200, 300)]);
        assert_eq!(s.tasks_between(100, 250).len(), 1);
        assert_eq!(s.tasks_between(0, 1).len(), 1);
    }
}
