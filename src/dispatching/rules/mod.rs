//! Built-in task ordering rules.
//!
//! # Categories
//!
//! - **Rank**: PRIORITY_RANK
//! - **Time-based**: EARLIEST_START, SPT
//! - **Flags**: CRITICAL_FIRST
//!
//! # Score Convention
//! All rules return lower scores for tasks that should be staffed first.

use super::{DispatchingRule, RuleScore};
use crate::models::Task;

// ======================== Rank ========================

/// Optimizer priority rank, ascending.
///
/// The upstream global priority list numbers tasks 1, 2, 3, ...;
/// rank 1 is staffed first.
#[derive(Debug, Clone, Copy)]
pub struct PriorityRank;

impl DispatchingRule for PriorityRank {
    fn name(&self) -> &'static str {
        "PRIORITY_RANK"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        task.priority as f64
    }

    fn description(&self) -> &'static str {
        "Priority Rank Ascending"
    }
}

// ======================== Time-based ========================

/// Earliest start time first.
#[derive(Debug, Clone, Copy)]
pub struct EarliestStart;

impl DispatchingRule for EarliestStart {
    fn name(&self) -> &'static str {
        "EARLIEST_START"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        task.start_ms as f64
    }

    fn description(&self) -> &'static str {
        "Earliest Start Time"
    }
}

/// Shortest task interval first.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        task.duration_ms() as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

// ======================== Flags ========================

/// Critical tasks before non-critical ones.
#[derive(Debug, Clone, Copy)]
pub struct CriticalFirst;

impl DispatchingRule for CriticalFirst {
    fn name(&self) -> &'static str {
        "CRITICAL_FIRST"
    }

    fn evaluate(&self, task: &Task) -> RuleScore {
        if task.flags.critical {
            0.0
        } else {
            1.0
        }
    }

    fn description(&self) -> &'static str {
        "Critical Tasks First"
    }
}
