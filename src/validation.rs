//! Input and state validation for assignment scenarios.
//!
//! Checks structural integrity before and after staffing. Every check runs
//! and all problems are returned at once.
//!
//! Input checks ([`validate_input`]):
//! - Duplicate task IDs
//! - Tasks ending before they start
//! - Headcounts above [`MAX_REQUIRED_WORKERS`]
//! - Dependencies on unknown tasks
//! - Circular dependencies (DAG validation)
//! - Requirements matching no capacity label
//!
//! State checks ([`validate_state`]):
//! - Records for unknown tasks
//! - Workers not constructible from capacities
//! - Slot counts disagreeing with the task
//! - Stale `partial` flags
//! - A worker in two slots of one task
//! - Workers booked on overlapping tasks
//!
//! # Reference
//! Kahn (1962), "Topological sorting of large networks", CACM 5(11)

use crate::models::{ScenarioInput, ScenarioState, Task, MAX_REQUIRED_WORKERS};
use crate::pool::is_known_worker;
use std::collections::{HashMap, HashSet, VecDeque};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task ends before it starts.
    InvalidInterval,
    /// A task asks for more workers than any crew can supply.
    ExcessiveHeadcount,
    /// A task depends on a task that doesn't exist.
    InvalidDependency,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// No capacity label can ever staff the task.
    UnmatchedRequirement,
    /// An assignment references a task that doesn't exist.
    UnknownTask,
    /// An assignment references a worker capacities can't produce.
    UnknownWorker,
    /// Slot count differs from the task's required count.
    SlotCountMismatch,
    /// `partial` disagrees with the filled slot count.
    PartialFlagMismatch,
    /// One worker fills two slots of the same task.
    DuplicateWorker,
    /// A worker is booked on overlapping tasks.
    WorkerOverlap,
}

impl ValidationErrorKind {
    /// Whether the problem still allows a run to proceed.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::UnmatchedRequirement | Self::WorkerOverlap)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scenario's input bundle.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. `end_ms >= start_ms` for every task
/// 3. `required_workers <= MAX_REQUIRED_WORKERS`
/// 4. All dependency references point to existing tasks
/// 5. No circular dependencies
/// 6. Every requirement is matched by at least one capacity label
///    (zero headcount counts as matched)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &ScenarioInput) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in &input.tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.end_ms < task.start_ms {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidInterval,
                format!(
                    "Task '{}' ends at {} before it starts at {}",
                    task.id, task.end_ms, task.start_ms
                ),
            ));
        }

        if task.required_workers > MAX_REQUIRED_WORKERS {
            errors.push(ValidationError::new(
                ValidationErrorKind::ExcessiveHeadcount,
                format!(
                    "Task '{}' requires {} workers (limit {})",
                    task.id, task.required_workers, MAX_REQUIRED_WORKERS
                ),
            ));
        }
    }

    // Check dependency references
    for task in &input.tasks {
        for dep in &task.dependencies {
            if !task_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidDependency,
                    format!("Task '{}' depends on unknown task '{}'", task.id, dep),
                ));
            }
        }
    }

    // Check for cycles in dependency graph
    if let Some(cycle_err) = detect_cycles(&input.tasks) {
        errors.push(cycle_err);
    }

    // Check that some label can staff each requirement
    for task in &input.tasks {
        let matched = input.capacities.iter().any(|(key, _)| {
            key.team == task.requirement.team
                && (task.requirement.skill.is_none() || task.requirement.skill == key.skill)
        });
        if !matched {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnmatchedRequirement,
                format!(
                    "Task '{}' requires '{}' but no capacity label matches",
                    task.id, task.requirement
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an assignment state against its input.
///
/// Checks:
/// 1. Every record's task exists
/// 2. Every assigned worker exists under current capacities
/// 3. Slot counts equal the task's required count
/// 4. `partial == (filled < required)`
/// 5. No worker fills two slots of one task
/// 6. No worker schedule has overlapping tasks
pub fn validate_state(state: &ScenarioState, input: &ScenarioInput) -> ValidationResult {
    let mut errors = Vec::new();
    let tasks = input.task_index();

    for (task_id, assignment) in state.assignments() {
        let Some(task) = tasks.get(task_id.as_str()) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownTask,
                format!("Assignment references unknown task '{task_id}'"),
            ));
            continue;
        };

        if assignment.required_slots() != task.slot_count() {
            errors.push(ValidationError::new(
                ValidationErrorKind::SlotCountMismatch,
                format!(
                    "Task '{}' has {} slots, requires {}",
                    task_id,
                    assignment.required_slots(),
                    task.slot_count()
                ),
            ));
        }

        if assignment.partial != (assignment.filled_slots() < assignment.required_slots()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::PartialFlagMismatch,
                format!(
                    "Task '{}' partial={} with {}/{} slots filled",
                    task_id,
                    assignment.partial,
                    assignment.filled_slots(),
                    assignment.required_slots()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for worker in assignment.workers() {
            if !seen.insert(worker) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateWorker,
                    format!("Worker '{worker}' fills two slots of task '{task_id}'"),
                ));
            }
            if !is_known_worker(&input.capacities, worker) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownWorker,
                    format!("Task '{task_id}' references unknown worker '{worker}'"),
                ));
            }
        }
    }

    for schedule in state.worker_schedules().values() {
        for conflict in schedule.conflicts() {
            errors.push(ValidationError::new(
                ValidationErrorKind::WorkerOverlap,
                format!(
                    "Worker '{}' is booked on '{}' and '{}' at once ({} ms overlap)",
                    schedule.worker_id, conflict.first, conflict.second, conflict.overlap_ms
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the dependency graph.
///
/// # Algorithm
/// Kahn's topological sort: repeatedly remove tasks whose known
/// predecessors are all removed. Tasks left over sit on or behind a cycle.
/// Iterative, so chain length is bounded by memory only.
///
/// Dependencies on unknown tasks are ignored here; they are reported as
/// [`ValidationErrorKind::InvalidDependency`].
fn detect_cycles(tasks: &[Task]) -> Option<ValidationError> {
    let mut in_degree: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
    for task in tasks {
        in_degree.entry(task.id.as_str()).or_insert(0);
    }

    // predecessor → dependents
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut seen_edges = HashSet::new();
    for task in tasks {
        for dep in &task.dependencies {
            if !in_degree.contains_key(dep.as_str())
                || !seen_edges.insert((dep.as_str(), task.id.as_str()))
            {
                continue;
            }
            dependents
                .entry(dep.as_str())
                .or_default()
                .push(task.id.as_str());
            if let Some(degree) = in_degree.get_mut(task.id.as_str()) {
                *degree += 1;
            }
        }
    }

    let mut ready: VecDeque<&str> = tasks
        .iter()
        .map(|t| t.id.as_str())
        .filter(|id| in_degree.get(id) == Some(&0))
        .collect();
    let mut removed = HashSet::with_capacity(in_degree.len());

    while let Some(node) = ready.pop_front() {
        if !removed.insert(node) {
            continue;
        }
        for &next in dependents.get(node).into_iter().flatten() {
            if let Some(degree) = in_degree.get_mut(next) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push_back(next);
                }
            }
        }
    }

    if removed.len() == in_degree.len() {
        return None;
    }
    let stuck = tasks
        .iter()
        .map(|t| t.id.as_str())
        .find(|id| !removed.contains(id))?;
    Some(ValidationError::new(
        ValidationErrorKind::CyclicDependency,
        format!("Circular dependency detected involving task '{stuck}'"),
    ))
}
