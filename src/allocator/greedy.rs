//! Greedy slot-filling allocator.
//!
//! # Algorithm
//!
//! 1. Order the visible tasks with the rule engine (priority rank, then
//!    start time, then task ID).
//! 2. Seed the availability tracker per the configured baseline.
//! 3. For each task, collect eligible workers that are free for the task
//!    interval, ranked by (exact skill match, ordinal, pool position), and
//!    take up to the required count.
//! 4. Commit the chosen workers and write a full or partial record that
//!    replaces the task's prior one. With no candidate the task is
//!    unassignable and its prior record (if any) is left untouched.
//! 5. Re-project every worker schedule.
//!
//! # Complexity
//! O(n log n + n * w log w) where n = tasks, w = pool size.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::report::{Outcome, RunOutcome, RunReport, RunSummary, TaskOutcome};
use crate::availability::AvailabilityTracker;
use crate::config::{AvailabilityBaseline, EngineConfig};
use crate::dispatching::RuleEngine;
use crate::eligibility::{is_eligible, skill_rank};
use crate::models::{Assignment, ScenarioInput, ScenarioState, Task, Worker};
use crate::pool::{build_pool, WorkerFilter, WorkerPool};

/// Greedy assignment engine.
///
/// Runs are pure: they read a state and return a new one, so a caller can
/// discard a run simply by not swapping its result in.
///
/// # Example
///
/// ```
/// use u_assign::allocator::{Allocator, Outcome};
/// use u_assign::models::{CapacityMap, ScenarioInput, ScenarioState, Task};
/// use u_assign::pool::WorkerFilter;
///
/// let input = ScenarioInput::new(
///     vec![Task::new("T1", 0, 3_600_000).with_team("Mechanic Team 1").with_workers(2)],
///     CapacityMap::new().with("Mechanic Team 1", 2),
/// );
/// let run = Allocator::new().run_filtered(&ScenarioState::new(), &input, &WorkerFilter::All);
/// assert_eq!(run.report.outcomes[0].outcome, Outcome::Full);
/// assert_eq!(run.state.assignment("T1").unwrap().filled_slots(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Allocator {
    config: EngineConfig,
    rule_engine: RuleEngine,
}

impl Allocator {
    /// Creates an allocator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the task ordering.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds the pool and visible task list for `filter`, then runs.
    pub fn run_filtered(
        &self,
        state: &ScenarioState,
        input: &ScenarioInput,
        filter: &WorkerFilter,
    ) -> RunOutcome {
        let pool = build_pool(&input.capacities, filter);
        let tasks: Vec<&Task> = input.tasks.iter().filter(|t| filter.admits_task(t)).collect();
        debug!(filter = %filter, tasks = tasks.len(), pool_size = pool.len(), "filter applied");
        self.run(state, input, &tasks, &pool)
    }

    /// Staffs `tasks` from `pool`, starting from `state`.
    ///
    /// Records of tasks outside `tasks`, and of tasks that found no
    /// worker, are kept untouched. Only explicit clears remove records.
    pub fn run(
        &self,
        state: &ScenarioState,
        input: &ScenarioInput,
        tasks: &[&Task],
        pool: &WorkerPool,
    ) -> RunOutcome {
        info!(
            event = "run_start",
            task_count = tasks.len(),
            pool_size = pool.len(),
            baseline = ?self.config.baseline,
        );

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(tasks.len());
        for &task in tasks {
            if seen.insert(task.id.as_str()) {
                unique.push(task);
            } else {
                warn!(task_id = %task.id, "duplicate task id in run; later copy ignored");
            }
        }

        let mut ordered = self.rule_engine.order(unique);
        let skipped = match self.config.max_tasks_per_run {
            Some(limit) if ordered.len() > limit => ordered.split_off(limit),
            _ => Vec::new(),
        };

        let mut assignments = state.assignments().clone();

        let mut tracker = AvailabilityTracker::new();
        if self.config.baseline == AvailabilityBaseline::Accumulate {
            let visible: HashSet<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
            let index = input.task_index();
            for (task_id, assignment) in &assignments {
                if visible.contains(task_id.as_str()) {
                    continue;
                }
                if let Some(task) = index.get(task_id.as_str()) {
                    for worker in assignment.workers() {
                        tracker.seed(worker, task.start_ms, task.end_ms);
                    }
                }
            }
            debug!(seeded_workers = tracker.seeded_workers(), "availability seeded");
        }

        let mut outcomes = Vec::with_capacity(ordered.len() + skipped.len());
        for task in ordered {
            let chosen = select_workers(task, pool, &tracker);
            for worker in &chosen {
                tracker.commit(&worker.id, task.start_ms, task.end_ms);
            }

            let required = task.slot_count();
            let outcome = match chosen.len() {
                0 => Outcome::Unassignable,
                n if n < required => Outcome::Partial,
                _ => Outcome::Full,
            };
            let workers: Vec<_> = chosen.iter().map(|w| w.id.clone()).collect();
            debug!(
                task_id = %task.id,
                outcome = ?outcome,
                filled = workers.len(),
                required,
                "task staffed"
            );

            if !workers.is_empty() {
                assignments.insert(
                    task.id.clone(),
                    Assignment::with_workers(task, workers.iter().cloned()),
                );
            }
            outcomes.push(TaskOutcome {
                task_id: task.id.clone(),
                outcome,
                workers,
                required,
                start_ms: task.start_ms,
                end_ms: task.end_ms,
            });
        }

        for task in skipped {
            outcomes.push(TaskOutcome {
                task_id: task.id.clone(),
                outcome: Outcome::Skipped,
                workers: Vec::new(),
                required: task.slot_count(),
                start_ms: task.start_ms,
                end_ms: task.end_ms,
            });
        }

        let summary = RunSummary::calculate(&outcomes, pool.len());
        info!(
            event = "run_end",
            full = summary.full,
            partial = summary.partial,
            unassignable = summary.unassignable,
            skipped = summary.skipped,
            roster_size = summary.roster_size,
        );

        RunOutcome {
            state: ScenarioState::from_assignments(assignments, input),
            report: RunReport { outcomes, summary },
        }
    }
}

/// Eligible, free workers for `task`, best first, at most the slot count.
fn select_workers<'p>(
    task: &Task,
    pool: &'p WorkerPool,
    tracker: &AvailabilityTracker,
) -> Vec<&'p Worker> {
    let mut candidates: Vec<(u8, u32, usize, &Worker)> = pool
        .workers()
        .iter()
        .enumerate()
        .filter(|(_, w)| {
            is_eligible(task, w) && tracker.is_free(&w.id, task.start_ms, task.end_ms)
        })
        .map(|(pos, w)| (skill_rank(task, w), w.ordinal(), pos, w))
        .collect();
    candidates.sort_by_key(|&(rank, ordinal, pos, _)| (rank, ordinal, pos));
    candidates
        .into_iter()
        .take(task.slot_count())
        .map(|(_, _, _, w)| w)
        .collect()
}
