//! Worker pool builder.
//!
//! Expands capacity headcounts into concrete [`Worker`]s for a filter
//! scope. Pure: the same capacities and filter always yield the same pool
//! in the same order (label order, then ordinal).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::models::{CapacityKey, CapacityMap, RoleClass, Task, Worker, WorkerId};

/// Which slice of the workforce (and task list) a run covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerFilter {
    /// Every team.
    All,
    /// Every team of one role-class.
    Role(RoleClass),
    /// One team, optionally narrowed to one skill.
    Team {
        team: String,
        skill: Option<String>,
    },
}

impl WorkerFilter {
    /// Filter for one team label (`"Team"` or `"Team (Skill)"`).
    pub fn team(label: &str) -> Self {
        let key = CapacityKey::parse(label);
        Self::Team {
            team: key.team,
            skill: key.skill,
        }
    }

    /// Whether workers under `key` belong to this scope.
    pub fn admits_key(&self, key: &CapacityKey) -> bool {
        match self {
            Self::All => true,
            Self::Role(role) => key.role() == *role,
            Self::Team { team, skill } => {
                key.team == *team && skill_admits(skill, &key.skill)
            }
        }
    }

    /// Whether `task` is visible in this scope.
    pub fn admits_task(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Role(role) => task.role_class() == *role,
            Self::Team { team, skill } => {
                task.requirement.team == *team && skill_admits(skill, &task.requirement.skill)
            }
        }
    }
}

/// An unnamed filter skill admits every skill.
fn skill_admits(wanted: &Option<String>, actual: &Option<String>) -> bool {
    wanted.is_none() || wanted == actual
}

impl fmt::Display for WorkerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Role(RoleClass::Standard) => f.write_str("all-mechanics"),
            Self::Role(RoleClass::Quality) => f.write_str("all-quality"),
            Self::Role(RoleClass::Customer) => f.write_str("all-customer"),
            Self::Team { team, skill } => {
                write!(f, "{}", CapacityKey::new(team.clone(), skill.clone()))
            }
        }
    }
}

impl FromStr for WorkerFilter {
    type Err = std::convert::Infallible;

    /// Parses UI filter strings: `all`, `all-mechanics`, `all-quality`,
    /// `all-customer`, otherwise a team label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => Self::All,
            "all-mechanics" => Self::Role(RoleClass::Standard),
            "all-quality" => Self::Role(RoleClass::Quality),
            "all-customer" => Self::Role(RoleClass::Customer),
            label => Self::team(label),
        })
    }
}

/// An ordered set of workers.
#[derive(Debug, Clone, Default)]
pub struct WorkerPool {
    workers: Vec<Worker>,
    positions: HashMap<WorkerId, usize>,
}

impl WorkerPool {
    /// Builds a pool from workers, keeping their order.
    pub fn from_workers(workers: Vec<Worker>) -> Self {
        let positions = workers
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.clone(), i))
            .collect();
        Self { workers, positions }
    }

    /// Workers in pool order.
    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Number of workers.
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Whether the pool contains the worker.
    pub fn contains(&self, id: &WorkerId) -> bool {
        self.positions.contains_key(id)
    }

    /// Looks up a worker by ID.
    pub fn get(&self, id: &WorkerId) -> Option<&Worker> {
        self.positions.get(id).map(|&i| &self.workers[i])
    }

    /// Pool position of a worker.
    pub fn position(&self, id: &WorkerId) -> Option<usize> {
        self.positions.get(id).copied()
    }
}

/// Expands `capacities` into the workers admitted by `filter`.
///
/// A headcount of 0 yields no workers for that label.
pub fn build_pool(capacities: &CapacityMap, filter: &WorkerFilter) -> WorkerPool {
    let workers = capacities
        .iter()
        .filter(|(key, _)| filter.admits_key(key))
        .flat_map(|(key, headcount)| (1..=headcount).map(move |n| Worker::new(key.clone(), n)))
        .collect();
    WorkerPool::from_workers(workers)
}

/// Whether `id` is constructible from `capacities`.
pub fn is_known_worker(capacities: &CapacityMap, id: &WorkerId) -> bool {
    id.ordinal >= 1 && id.ordinal <= capacities.headcount(&id.key)
}
