//! Per-task assignment records.
//!
//! An [`Assignment`] holds one slot per required worker. Unfilled slots are
//! kept in place (never compacted away), so slot positions stay stable
//! across manual edits. On the wire an unfilled slot is the empty string.

use serde::{Deserialize, Serialize};

use super::{CapacityKey, RoleClass, Task, WorkerId};

/// Lifecycle state of an assignment, derived from its filled slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// No slot filled.
    Unassigned,
    /// Some but not all slots filled.
    Partial,
    /// Every slot filled.
    Full,
}

/// Snapshot of the task requirement at the time the record was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementSnapshot {
    /// Team and skill label.
    pub requirement: CapacityKey,
    /// Effective role-class.
    pub role: RoleClass,
}

impl RequirementSnapshot {
    /// Captures a task's requirement.
    pub fn of(task: &Task) -> Self {
        Self {
            requirement: task.requirement.clone(),
            role: task.role_class(),
        }
    }
}

/// Worker slots for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Task this record staffs.
    pub task_id: String,
    /// One entry per required worker; `None` = unfilled.
    #[serde(with = "slot_serde")]
    pub slots: Vec<Option<WorkerId>>,
    /// Requirement snapshot.
    pub snapshot: RequirementSnapshot,
    /// `true` iff fewer slots are filled than required.
    pub partial: bool,
}

impl Assignment {
    /// Creates an all-empty record sized to the task.
    pub fn stub(task: &Task) -> Self {
        Self {
            task_id: task.id.clone(),
            slots: vec![None; task.slot_count()],
            snapshot: RequirementSnapshot::of(task),
            partial: true,
        }
    }

    /// Creates a record with `workers` in the leading slots.
    ///
    /// Workers beyond the task's slot count are ignored.
    pub fn with_workers(task: &Task, workers: impl IntoIterator<Item = WorkerId>) -> Self {
        let mut assignment = Self::stub(task);
        for (slot, worker) in assignment.slots.iter_mut().zip(workers) {
            *slot = Some(worker);
        }
        assignment.refresh();
        assignment
    }

    /// Number of filled slots.
    pub fn filled_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Number of required slots.
    #[inline]
    pub fn required_slots(&self) -> usize {
        self.slots.len()
    }

    /// Derived lifecycle status.
    pub fn status(&self) -> AssignmentStatus {
        match self.filled_slots() {
            0 => AssignmentStatus::Unassigned,
            n if n < self.required_slots() => AssignmentStatus::Partial,
            _ => AssignmentStatus::Full,
        }
    }

    /// Recomputes the `partial` flag from the slots.
    pub fn refresh(&mut self) {
        self.partial = self.filled_slots() < self.required_slots();
    }

    /// Workers occupying a slot, in slot order.
    pub fn workers(&self) -> impl Iterator<Item = &WorkerId> {
        self.slots.iter().flatten()
    }

    /// Whether `worker` occupies any slot.
    pub fn contains(&self, worker: &WorkerId) -> bool {
        self.workers().any(|w| w == worker)
    }

    /// Position of `worker`, if it occupies a slot.
    pub fn slot_of(&self, worker: &WorkerId) -> Option<usize> {
        self.slots.iter().position(|s| s.as_ref() == Some(worker))
    }
}

mod slot_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::models::WorkerId;

    pub fn serialize<S: Serializer>(
        slots: &[Option<WorkerId>],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let wire: Vec<String> = slots
            .iter()
            .map(|s| s.as_ref().map(ToString::to_string).unwrap_or_default())
            .collect();
        wire.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Option<WorkerId>>, D::Error> {
        let wire = Vec::<String>::deserialize(deserializer)?;
        wire.into_iter()
            .map(|s| {
                if s.is_empty() {
                    Ok(None)
                } else {
                    s.parse().map(Some).map_err(serde::de::Error::custom)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_worker_task() -> Task {
        Task::new("T1", 0, 1000)
            .with_team("Mechanic Team 1 (Skill 1)")
            .with_workers(2)
    }

    #[test]
    fn test_stub_is_sized_and_empty() {
        let a = Assignment::stub(&two_worker_task());
        assert_eq!(a.required_slots(), 2);
        assert_eq!(a.filled_slots(), 0);
        assert!(a.partial);
        assert_eq!(a.status(), AssignmentStatus::Unassigned);
    }

    #[test]
    fn test_with_workers_partial_and_full() {
        let task = two_worker_task();
        let w1 = WorkerId::from_label("Mechanic Team 1 (Skill 1)", 1);
        let w2 = WorkerId::from_label("Mechanic Team 1 (Skill 1)", 2);

        let partial = Assignment::with_workers(&task, vec![w1.clone()]);
        assert!(partial.partial);
        assert_eq!(partial.status(), AssignmentStatus::Partial);
        assert_eq!(partial.slots[1], None);

        let full = Assignment::with_workers(&task, vec![w1.clone(), w2.clone()]);
        assert!(!full.partial);
        assert_eq!(full.status(), AssignmentStatus::Full);
        assert_eq!(full.slot_of(&w2), Some(1));
        assert!(full.contains(&w1));
    }

    #[test]
    fn test_with_workers_ignores_extra() {
        let task = Task::new("T1", 0, 1).with_team("Mechanic Team 1");
        let ids = (1..=3).map(|n| WorkerId::from_label("Mechanic Team 1", n));
        let a = Assignment::with_workers(&task, ids);
        assert_eq!(a.required_slots(), 1);
        assert_eq!(a.filled_slots(), 1);
    }

    #[test]
    fn test_empty_slot_serializes_as_empty_string() {
        let task = two_worker_task();
        let w1 = WorkerId::from_label("Mechanic Team 1 (Skill 1)", 1);
        let a = Assignment::with_workers(&task, vec![w1]);

        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(
            json["slots"],
            serde_json::json!(["Mechanic Team 1 (Skill 1)_1", ""])
        );

        let back: Assignment = serde_json::from_value(json).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_bad_slot_string_fails_to_load() {
        let json = serde_json::json!({
            "task_id": "T1",
            "slots": ["no-ordinal"],
            "snapshot": { "requirement": "Mechanic Team 1", "role": "standard" },
            "partial": false
        });
        assert!(serde_json::from_value::<Assignment>(json).is_err());
    }
}
