//! Eligibility matching between tasks and workers.
//!
//! Decision order:
//! 1. Role-class must be equal (customer ↔ customer, quality ↔ quality,
//!    standard ↔ standard).
//! 2. A fully qualified task requirement (team and skill) needs the exact
//!    same capacity label.
//! 3. Otherwise the team names must match; a task without a skill
//!    requirement accepts any skill.

use crate::models::{Task, Worker};

/// Whether `worker` may perform `task`.
pub fn is_eligible(task: &Task, worker: &Worker) -> bool {
    if task.role_class() != worker.role {
        return false;
    }

    let required = &task.requirement;
    if required.has_skill() {
        return *required == worker.id.key;
    }

    required.team == worker.team()
}

/// Tie-break rank among eligible workers (lower is preferred).
///
/// When the task names a skill, workers holding exactly that skill rank 0;
/// every other case ranks 1.
pub fn skill_rank(task: &Task, worker: &Worker) -> u8 {
    match task.requirement.skill.as_deref() {
        Some(skill) if worker.has_skill(skill) => 0,
        _ => 1,
    }
}
