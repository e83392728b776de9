//! Crew assignment domain models.
//!
//! Provides the data types shared by the pool builder, the assignment
//! engine and the schedule projector.
//!
//! # Domain Mappings
//!
//! | u-assign | Production floor | Meaning |
//! |----------|------------------|---------|
//! | Task | Task instance | Timed work needing N people |
//! | CapacityKey | "Team (Skill)" label | Headcount bucket |
//! | Worker | Mechanic / Inspector | One synthesized person |
//! | Assignment | Task staffing | N ordered worker slots |
//! | WorkerSchedule | Personal agenda | Tasks per worker, by start time |

mod assignment;
mod capacity;
mod scenario;
mod schedule;
mod task;
mod worker;

pub use assignment::{Assignment, AssignmentStatus, RequirementSnapshot};
pub use capacity::{CapacityKey, CapacityMap, RoleClass};
pub use scenario::{ScenarioInput, ScenarioState};
pub use schedule::{ScheduleConflict, ScheduledTask, WorkerSchedule};
pub use task::{Task, TaskFlags, MAX_REQUIRED_WORKERS};
pub use worker::{ParseWorkerIdError, Worker, WorkerId};
