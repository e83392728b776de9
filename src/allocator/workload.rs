//! Per-team workload and utilization.
//!
//! Aggregates the tasks of each capacity label by calendar day and relates
//! the scheduled demand to the crew the label can field over the planning
//! horizon.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Task count / minutes / workers | Per day, from the label's tasks |
//! | Utilization hours | Day minutes / 60, one decimal |
//! | Scheduled minutes | Σ duration × required workers |
//! | Assigned minutes | Σ duration × filled slots of the current records |
//! | Available minutes | Headcount × shifts × [`MINUTES_PER_SHIFT`] × horizon days |
//! | Utilization | ⌊scheduled / available × 100⌋ capped at 100, 0 when nothing is available |
//!
//! Days are whole UTC days since the scheduling epoch
//! (`start_ms.div_euclid(MS_PER_DAY)`). The horizon runs from the earliest
//! task start to the latest task end over the whole input, rounded up to
//! whole days.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{CapacityKey, ScenarioInput, ScenarioState, Task};

/// Working minutes in one shift (8.5 hours).
pub const MINUTES_PER_SHIFT: i64 = 510;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// One day of a label's workload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    /// Day index since the epoch.
    pub day: i64,
    /// Tasks starting on this day.
    pub task_count: usize,
    /// Sum of task durations (minutes).
    pub total_minutes: i64,
    /// Sum of required workers.
    pub total_workers: usize,
    /// `total_minutes / 60`, rounded to one decimal.
    pub utilization_hours: f64,
}

/// Workload of one capacity label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamWorkload {
    /// Capacity label.
    pub team: String,
    /// Headcount of the label.
    pub capacity: u32,
    /// Shifts per day worked by the label.
    pub shifts_per_day: usize,
    /// Per-day load, ascending by day.
    pub days: Vec<DailyLoad>,
    /// Demand in worker-minutes.
    pub scheduled_minutes: i64,
    /// Worker-minutes covered by current records.
    pub assigned_minutes: i64,
    /// Worker-minutes the crew can supply over the horizon.
    pub available_minutes: i64,
    /// Utilization percentage (0-100).
    pub utilization_pct: u32,
}

impl TeamWorkload {
    /// Tasks across all days.
    pub fn task_count(&self) -> usize {
        self.days.iter().map(|d| d.task_count).sum()
    }
}

/// Workload of every label in a scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadReport {
    /// Planning horizon in whole days (0 without tasks).
    pub horizon_days: i64,
    /// Label → workload.
    pub teams: BTreeMap<String, TeamWorkload>,
}

impl WorkloadReport {
    /// Computes the report from the input tasks and the current records.
    ///
    /// Every capacity label appears, as does every label a task asks for.
    pub fn calculate(input: &ScenarioInput, state: &ScenarioState) -> Self {
        let horizon_days = horizon_days(&input.tasks);

        let mut by_label: BTreeMap<String, (CapacityKey, Vec<&Task>)> = input
            .capacities
            .iter()
            .map(|(key, _)| (key.to_string(), (key.clone(), Vec::new())))
            .collect();
        for task in &input.tasks {
            by_label
                .entry(task.requirement.to_string())
                .or_insert_with(|| (task.requirement.clone(), Vec::new()))
                .1
                .push(task);
        }

        let teams = by_label
            .into_iter()
            .map(|(label, (key, tasks))| {
                let workload = team_workload(&label, &key, &tasks, input, state, horizon_days);
                (label, workload)
            })
            .collect();

        Self {
            horizon_days,
            teams,
        }
    }

    /// Workload of one label.
    pub fn team(&self, label: &str) -> Option<&TeamWorkload> {
        self.teams.get(label)
    }
}

fn horizon_days(tasks: &[Task]) -> i64 {
    let start = tasks.iter().map(|t| t.start_ms).min();
    let end = tasks.iter().map(|t| t.end_ms).max();
    match (start, end) {
        (Some(start), Some(end)) => {
            let span = end.saturating_sub(start).max(0);
            span.div_euclid(MS_PER_DAY) + i64::from(span.rem_euclid(MS_PER_DAY) > 0)
        }
        _ => 0,
    }
}

fn team_workload(
    label: &str,
    key: &CapacityKey,
    tasks: &[&Task],
    input: &ScenarioInput,
    state: &ScenarioState,
    horizon_days: i64,
) -> TeamWorkload {
    let capacity = input.capacities.headcount(key);
    // Shift maps may be keyed by full label or by bare team.
    let shifts_per_day = input
        .shifts
        .get(label)
        .or_else(|| input.shifts.get(&key.team))
        .map_or(0, Vec::len);

    let mut days: BTreeMap<i64, DailyLoad> = BTreeMap::new();
    let mut scheduled_minutes = 0i64;
    let mut assigned_minutes = 0i64;
    for task in tasks {
        let minutes = task.duration_in_minutes();
        let day = task.start_ms.div_euclid(MS_PER_DAY);
        let load = days.entry(day).or_insert_with(|| DailyLoad {
            day,
            task_count: 0,
            total_minutes: 0,
            total_workers: 0,
            utilization_hours: 0.0,
        });
        load.task_count += 1;
        load.total_minutes = load.total_minutes.saturating_add(minutes);
        load.total_workers += task.slot_count();

        scheduled_minutes =
            scheduled_minutes.saturating_add(minutes.saturating_mul(task.slot_count() as i64));
        if let Some(record) = state.assignment(&task.id) {
            assigned_minutes = assigned_minutes
                .saturating_add(minutes.saturating_mul(record.filled_slots() as i64));
        }
    }

    let days: Vec<DailyLoad> = days
        .into_values()
        .map(|mut load| {
            load.utilization_hours = (load.total_minutes as f64 / 60.0 * 10.0).round() / 10.0;
            load
        })
        .collect();

    let available_minutes = i64::from(capacity)
        .saturating_mul(shifts_per_day as i64)
        .saturating_mul(MINUTES_PER_SHIFT)
        .saturating_mul(horizon_days);
    let utilization_pct = if available_minutes > 0 {
        ((scheduled_minutes as f64 / available_minutes as f64) * 100.0).clamp(0.0, 100.0) as u32
    } else {
        0
    };

    TeamWorkload {
        team: label.to_string(),
        capacity,
        shifts_per_day,
        days,
        scheduled_minutes,
        assigned_minutes,
        available_minutes,
        utilization_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Allocator;
    use crate::models::CapacityMap;
    use crate::pool::WorkerFilter;

    const HOUR: i64 = 3_600_000;

    fn shifts(entries: &[(&str, usize)]) -> BTreeMap<String, Vec<String>> {
        entries
            .iter()
            .map(|&(team, n)| {
                let names = (1..=n).map(|i| format!("shift {i}")).collect();
                (team.to_string(), names)
            })
            .collect()
    }

    fn input() -> ScenarioInput {
        ScenarioInput::new(
            vec![
                Task::new("T1", 8 * HOUR, 10 * HOUR)
                    .with_team("Mechanic Team 1")
                    .with_workers(2),
                Task::new("T2", 12 * HOUR, 13 * HOUR).with_team("Mechanic Team 1"),
                Task::new("T3", MS_PER_DAY + 8 * HOUR, MS_PER_DAY + 11 * HOUR)
                    .with_team("Mechanic Team 1"),
                Task::new("Q1", 9 * HOUR, 10 * HOUR).with_team("Quality Team 1"),
            ],
            CapacityMap::new()
                .with("Mechanic Team 1", 2)
                .with("Quality Team 1", 1)
                .with("Customer Team 1", 1),
        )
        .with_shifts(shifts(&[("Mechanic Team 1", 2), ("Quality Team 1", 1)]))
    }

    #[test]
    fn test_daily_grouping() {
        let report = WorkloadReport::calculate(&input(), &ScenarioState::new());
        let mech = report.team("Mechanic Team 1").unwrap();

        assert_eq!(mech.capacity, 2);
        assert_eq!(mech.shifts_per_day, 2);
        assert_eq!(mech.days.len(), 2);
        assert_eq!(mech.days[0].day, 0);
        assert_eq!(mech.days[0].task_count, 2);
        assert_eq!(mech.days[0].total_minutes, 180);
        assert_eq!(mech.days[0].total_workers, 3);
        assert!((mech.days[0].utilization_hours - 3.0).abs() < 1e-10);
        assert_eq!(mech.days[1].day, 1);
        assert_eq!(mech.task_count(), 3);
    }

    #[test]
    fn test_utilization_percentage() {
        let report = WorkloadReport::calculate(&input(), &ScenarioState::new());
        // 8:00 day 0 to 11:00 day 1 rounds up to two days.
        assert_eq!(report.horizon_days, 2);

        let mech = report.team("Mechanic Team 1").unwrap();
        assert_eq!(mech.scheduled_minutes, 120 * 2 + 60 + 180);
        assert_eq!(mech.available_minutes, 2 * 2 * 510 * 2);
        assert_eq!(mech.utilization_pct, 11);

        let quality = report.team("Quality Team 1").unwrap();
        assert_eq!(quality.available_minutes, 510 * 2);
        assert_eq!(quality.utilization_pct, 5);
    }

    #[test]
    fn test_no_shifts_or_tasks_means_zero() {
        let report = WorkloadReport::calculate(&input(), &ScenarioState::new());
        let customer = report.team("Customer Team 1").unwrap();
        assert_eq!(customer.available_minutes, 0);
        assert_eq!(customer.utilization_pct, 0);
        assert!(customer.days.is_empty());

        let empty = ScenarioInput::new(vec![], CapacityMap::new());
        let report = WorkloadReport::calculate(&empty, &ScenarioState::new());
        assert_eq!(report.horizon_days, 0);
        assert!(report.teams.is_empty());
    }

    #[test]
    fn test_utilization_capped() {
        let input = ScenarioInput::new(
            vec![Task::new("T1", 0, 20 * HOUR)
                .with_team("Mechanic Team 1")
                .with_workers(5)],
            CapacityMap::new().with("Mechanic Team 1", 1),
        )
        .with_shifts(shifts(&[("Mechanic Team 1", 1)]));

        let report = WorkloadReport::calculate(&input, &ScenarioState::new());
        assert_eq!(report.team("Mechanic Team 1").unwrap().utilization_pct, 100);
    }

    #[test]
    fn test_assigned_minutes_follow_records() {
        let input = input();
        let run = Allocator::new().run_filtered(&ScenarioState::new(), &input, &WorkerFilter::All);
        let report = WorkloadReport::calculate(&input, &run.state);

        let mech = report.team("Mechanic Team 1").unwrap();
        assert_eq!(mech.assigned_minutes, mech.scheduled_minutes);
        let quality = report.team("Quality Team 1").unwrap();
        assert_eq!(quality.assigned_minutes, 60);
    }

    #[test]
    fn test_unlisted_label_reported() {
        let mut input = input();
        input
            .tasks
            .push(Task::new("X1", 0, HOUR).with_team("Mechanic Team 9 (Skill 2)"));

        let report = WorkloadReport::calculate(&input, &ScenarioState::new());
        let orphan = report.team("Mechanic Team 9 (Skill 2)").unwrap();
        assert_eq!(orphan.capacity, 0);
        assert_eq!(orphan.task_count(), 1);
    }
}
