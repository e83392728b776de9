//! Run outcomes and summary metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Full / Partial / Unassignable | Outcome counts over processed tasks |
//! | Skipped | Visible tasks beyond the per-run limit |
//! | Pool size | Workers offered to the run |
//! | Roster size | Workers that received at least one task |
//! | Fill rate | Filled slots / required slots |
//! | Busy time | Committed time per worker |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{ScenarioState, WorkerId};

/// Result of staffing one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every slot filled.
    Full,
    /// Some slots filled; the record is marked partial.
    Partial,
    /// No eligible worker was free; no record written.
    Unassignable,
    /// Not processed in this run (per-run limit reached).
    Skipped,
}

/// Outcome for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutcome {
    /// Task ID.
    pub task_id: String,
    /// Outcome kind.
    pub outcome: Outcome,
    /// Workers committed, in slot order.
    pub workers: Vec<WorkerId>,
    /// Required slot count.
    pub required: usize,
    /// Task start (ms).
    pub start_ms: i64,
    /// Task end (ms).
    pub end_ms: i64,
}

impl TaskOutcome {
    /// Number of slots left open.
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.workers.len())
    }
}

/// Aggregate run metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Fully staffed tasks.
    pub full: usize,
    /// Partially staffed tasks.
    pub partial: usize,
    /// Tasks with no worker.
    pub unassignable: usize,
    /// Tasks beyond the per-run limit.
    pub skipped: usize,
    /// Workers offered to the run.
    pub pool_size: usize,
    /// Workers that received at least one task.
    pub roster_size: usize,
    /// Slots filled across processed tasks.
    pub filled_slots: usize,
    /// Slots required across processed tasks.
    pub required_slots: usize,
    /// Committed time per worker (ms).
    pub busy_ms_by_worker: BTreeMap<WorkerId, i64>,
}

impl RunSummary {
    /// Computes the summary from per-task outcomes.
    pub fn calculate(outcomes: &[TaskOutcome], pool_size: usize) -> Self {
        let mut summary = Self {
            pool_size,
            ..Self::default()
        };

        for outcome in outcomes {
            match outcome.outcome {
                Outcome::Full => summary.full += 1,
                Outcome::Partial => summary.partial += 1,
                Outcome::Unassignable => summary.unassignable += 1,
                Outcome::Skipped => {
                    summary.skipped += 1;
                    continue;
                }
            }
            summary.required_slots += outcome.required;
            summary.filled_slots += outcome.workers.len();
            for worker in &outcome.workers {
                let busy = summary.busy_ms_by_worker.entry(worker.clone()).or_insert(0);
                *busy = busy.saturating_add(outcome.end_ms.saturating_sub(outcome.start_ms));
            }
        }

        summary.roster_size = summary.busy_ms_by_worker.len();
        summary
    }

    /// Filled / required slots (1.0 when nothing was required).
    pub fn fill_rate(&self) -> f64 {
        if self.required_slots == 0 {
            1.0
        } else {
            self.filled_slots as f64 / self.required_slots as f64
        }
    }

    /// Processed task count (excludes skipped).
    pub fn processed(&self) -> usize {
        self.full + self.partial + self.unassignable
    }

    /// One-line status message.
    pub fn message(&self) -> String {
        format!(
            "Assigned {} tasks ({} partial, {} unassignable) using {} of {} workers",
            self.full + self.partial,
            self.partial,
            self.unassignable,
            self.roster_size,
            self.pool_size
        )
    }
}

/// Per-run report handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Outcomes in visiting order (skipped tasks last).
    pub outcomes: Vec<TaskOutcome>,
    /// Aggregates.
    pub summary: RunSummary,
}

impl RunReport {
    /// Outcome for a task, if it was visible in the run.
    pub fn outcome_for(&self, task_id: &str) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.task_id == task_id)
    }
}

/// The new state plus its report.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// State to swap in.
    pub state: ScenarioState,
    /// What happened.
    pub report: RunReport,
}
