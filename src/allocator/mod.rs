//! Assignment engine, manual edits and run metrics.
//!
//! # Algorithm
//!
//! [`Allocator`] uses a greedy, priority-driven, first-free-worker
//! heuristic. It is not optimal: a task visited early can take a worker a
//! later, more constrained task needed. It is fast, deterministic and
//! reproducible, which is what planners re-running a scenario expect.
//!
//! # Report
//!
//! Every run returns a [`RunReport`] with one [`TaskOutcome`] per visible
//! task and a [`RunSummary`] (counts, fill rate, roster size).
//! [`WorkloadReport`] relates each label's demand to its crew over the
//! planning horizon.
//!
//! # Manual edits
//!
//! [`set_slot`], [`clear_assignment`] and [`clear_all`] are pure functions
//! over a state; they never consult worker availability unless the
//! [`ManualEditPolicy`](crate::config::ManualEditPolicy) says so.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"

mod greedy;
mod manual;
mod report;
mod workload;

pub use greedy::Allocator;
pub use manual::{clear_all, clear_assignment, parse_slot_value, set_slot, SlotEdit};
pub use report::{Outcome, RunOutcome, RunReport, RunSummary, TaskOutcome};
pub use workload::{DailyLoad, TeamWorkload, WorkloadReport, MINUTES_PER_SHIFT, MS_PER_DAY};
