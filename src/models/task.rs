//! Task model.
//!
//! A task is one timed unit of production work exported by the upstream
//! optimizer. Its start/end, priority rank and worker headcount are fixed;
//! the assignment engine only decides *who* performs it.

use serde::{Deserialize, Serialize};

use super::{CapacityKey, RoleClass};

/// Largest headcount a task may ask for. Larger requests are reported by
/// validation and clamped when slots are sized.
pub const MAX_REQUIRED_WORKERS: u32 = 1_000;

/// Boolean markers carried through from the optimizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFlags {
    /// Slack below the critical threshold.
    #[serde(default)]
    pub critical: bool,
    /// Waits on a late part delivery.
    #[serde(default)]
    pub late_part: bool,
    /// Rework of an earlier task.
    #[serde(default)]
    pub rework: bool,
}

/// A timed task to be staffed.
///
/// # Time Representation
/// All times are in milliseconds relative to a scheduling epoch (t=0).
/// The interval is half-open: `[start_ms, end_ms)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier within a scenario.
    pub id: String,
    /// Task type label (e.g. "Production", "Quality Inspection").
    #[serde(default)]
    pub task_type: String,
    /// Product line the task belongs to.
    #[serde(default)]
    pub product: String,
    /// Number of workers required. Zero is treated as one.
    pub required_workers: u32,
    /// Start time (ms).
    pub start_ms: i64,
    /// End time (ms).
    pub end_ms: i64,
    /// Team (and optional skill) requirement.
    pub requirement: CapacityKey,
    /// Explicit role-class; derived from the team when absent.
    #[serde(default)]
    pub role: Option<RoleClass>,
    /// Global priority rank (lower = assigned first).
    pub priority: i32,
    /// Optimizer flags.
    #[serde(default)]
    pub flags: TaskFlags,
    /// Predecessor task IDs. Informational only; never enforced here.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Shift the optimizer placed the task in.
    #[serde(default)]
    pub shift: Option<String>,
    /// Explicit duration in minutes, when the optimizer exported one.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    /// Slack to the delivery date, in hours.
    #[serde(default)]
    pub slack_hours: Option<f64>,
}

impl Task {
    /// Creates a new single-worker task with the given ID and interval.
    ///
    /// The team requirement starts empty; set it with [`Task::with_team`].
    pub fn new(id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            id: id.into(),
            task_type: String::new(),
            product: String::new(),
            required_workers: 1,
            start_ms,
            end_ms,
            requirement: CapacityKey::team(""),
            role: None,
            priority: 0,
            flags: TaskFlags::default(),
            dependencies: Vec::new(),
            shift: None,
            duration_minutes: None,
            slack_hours: None,
        }
    }

    /// Sets the team requirement from a label.
    ///
    /// A `"Team (Skill)"` label sets both team and skill.
    pub fn with_team(mut self, label: &str) -> Self {
        self.requirement = CapacityKey::parse(label);
        self
    }

    /// Sets (or overrides) the skill requirement.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.requirement.skill = Some(skill.into());
        self
    }

    /// Sets the explicit role-class.
    pub fn with_role(mut self, role: RoleClass) -> Self {
        self.role = Some(role);
        self
    }

    /// Sets the number of required workers.
    pub fn with_workers(mut self, required: u32) -> Self {
        self.required_workers = required;
        self
    }

    /// Sets the priority rank.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the task type label.
    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = task_type.into();
        self
    }

    /// Sets the product line.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    /// Sets the optimizer flags.
    pub fn with_flags(mut self, flags: TaskFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Adds an informational predecessor.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Sets the shift name.
    pub fn with_shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = Some(shift.into());
        self
    }

    /// Number of worker slots; a zero requirement counts as one and the
    /// count never exceeds [`MAX_REQUIRED_WORKERS`].
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.required_workers.clamp(1, MAX_REQUIRED_WORKERS) as usize
    }

    /// Effective role-class (explicit, else derived from the team).
    pub fn role_class(&self) -> RoleClass {
        self.role.unwrap_or_else(|| self.requirement.role())
    }

    /// Interval length (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Duration in minutes: the exported value, else derived from the interval.
    pub fn duration_in_minutes(&self) -> i64 {
        self.duration_minutes
            .unwrap_or_else(|| self.duration_ms() / 60_000)
    }

    /// Whether two tasks' intervals overlap.
    pub fn overlaps(&self, other: &Task) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    #[test]
    fn test_task_builder() {
        let task = Task::new("T1", 8 * HOUR, 9 * HOUR)
            .with_team("Mechanic Team 1 (Skill 1)")
            .with_workers(2)
            .with_priority(3)
            .with_type("Production")
            .with_product("Product A")
            .with_dependency("T0")
            .with_shift("1st");

        assert_eq!(task.id, "T1");
        assert_eq!(task.requirement.team, "Mechanic Team 1");
        assert_eq!(task.requirement.skill.as_deref(), Some("Skill 1"));
        assert_eq!(task.slot_count(), 2);
        assert_eq!(task.priority, 3);
        assert_eq!(task.dependencies, vec!["T0".to_string()]);
        assert_eq!(task.shift.as_deref(), Some("1st"));
        assert_eq!(task.duration_in_minutes(), 60);
    }

    #[test]
    fn test_zero_workers_counts_as_one() {
        let task = Task::new("T1", 0, 1000).with_workers(0);
        assert_eq!(task.slot_count(), 1);
    }

    #[test]
    fn test_slot_count_capped() {
        let task = Task::new("T1", 0, 1000).with_workers(u32::MAX);
        assert_eq!(task.slot_count(), MAX_REQUIRED_WORKERS as usize);
    }

    #[test]
    fn test_duration_saturates_at_extremes() {
        let task = Task::new("T1", i64::MIN, i64::MAX);
        assert_eq!(task.duration_ms(), i64::MAX);
        let reversed = Task::new("T2", i64::MAX, i64::MIN);
        assert_eq!(reversed.duration_ms(), i64::MIN);
        assert_eq!(task.duration_in_minutes(), i64::MAX / 60_000);
    }

    #[test]
    fn test_role_derived_or_explicit() {
        let quality = Task::new("Q1", 0, 1).with_team("Quality Team 1");
        assert_eq!(quality.role_class(), RoleClass::Quality);

        let forced = Task::new("C1", 0, 1)
            .with_team("Mechanic Team 1")
            .with_role(RoleClass::Customer);
        assert_eq!(forced.role_class(), RoleClass::Customer);
    }

    #[test]
    fn test_with_skill_overrides_label() {
        let task = Task::new("T1", 0, 1)
            .with_team("Mechanic Team 1")
            .with_skill("Skill 3");
        assert_eq!(task.requirement.to_string(), "Mechanic Team 1 (Skill 3)");
    }

    #[test]
    fn test_overlaps_half_open() {
        let a = Task::new("A", 0, 1000);
        let b = Task::new("B", 1000, 2000);
        let c = Task::new("C", 500, 1500);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn test_explicit_duration_minutes() {
        let mut task = Task::new("T1", 0, HOUR);
        task.duration_minutes = Some(45);
        assert_eq!(task.duration_in_minutes(), 45);
    }
}
