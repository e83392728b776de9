//! Task ordering rules and rule engine.
//!
//! The assignment engine staffs tasks greedily, so the order in which it
//! visits them decides who gets scarce workers. That order is an explicit,
//! testable comparator built from rules rather than implicit list order.
//!
//! # Usage
//!
//! ```
//! use u_assign::dispatching::{RuleEngine, TieBreaker};
//! use u_assign::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::PriorityRank)
//!     .with_rule(rules::EarliestStart)
//!     .with_final_tie_breaker(TieBreaker::ById);
//!
//! // Same as the engine default.
//! assert_eq!(format!("{engine:?}"), format!("{:?}", RuleEngine::staffing_order()));
//! ```

mod engine;
pub mod rules;

pub use engine::{RuleEngine, TieBreaker};

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by an ordering rule.
///
/// Lower scores = visited first.
pub type RuleScore = f64;

/// A rule that scores a task's position in the staffing order.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY_RANK").
    fn name(&self) -> &'static str;

    /// Scores a task; lower = visited first.
    fn evaluate(&self, task: &Task) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
