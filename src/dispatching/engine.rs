//! Rule engine for multi-criteria task ordering.
//!
//! Rules are applied in sequence: a later rule only decides when every
//! earlier rule ties. A final tie-breaker makes the order total.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule, RuleScore};
use crate::models::Task;

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Default)]
pub enum TieBreaker {
    /// Keep input order (stable sort).
    #[default]
    Stable,
    /// Deterministic by task ID (lexicographic).
    ById,
}

/// A composable, sequential rule engine for task ordering.
///
/// # Example
/// ```
/// use u_assign::dispatching::RuleEngine;
/// use u_assign::dispatching::rules;
/// use u_assign::models::Task;
///
/// let tasks = vec![
///     Task::new("late", 5_000, 6_000).with_priority(1),
///     Task::new("early", 1_000, 2_000).with_priority(1),
///     Task::new("urgent", 9_000, 9_500).with_priority(0),
/// ];
/// let engine = RuleEngine::staffing_order();
/// let order: Vec<&str> = engine.order(&tasks).iter().map(|t| t.id.as_str()).collect();
/// assert_eq!(order, vec!["urgent", "early", "late"]);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            tie_breaker: TieBreaker::Stable,
            epsilon: 1e-9,
        }
    }

    /// Priority rank ascending, then start ascending, then task ID.
    pub fn staffing_order() -> Self {
        Self::new()
            .with_rule(rules::PriorityRank)
            .with_rule(rules::EarliestStart)
            .with_final_tie_breaker(TieBreaker::ById)
    }

    /// Appends a rule; earlier rules take precedence.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Returns indices into `tasks`, in visiting order.
    pub fn sort_indices(&self, tasks: &[Task]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&tasks[a], &tasks[b]));
        indices
    }

    /// Returns task references in visiting order.
    pub fn order<'a, I>(&self, tasks: I) -> Vec<&'a Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut ordered: Vec<&Task> = tasks.into_iter().collect();
        ordered.sort_by(|a, b| self.compare(a, b));
        ordered
    }

    /// Returns the index of the task visited first.
    pub fn select_best(&self, tasks: &[Task]) -> Option<usize> {
        self.sort_indices(tasks).first().copied()
    }

    /// Scores a single task under each rule.
    pub fn evaluate(&self, task: &Task) -> Vec<RuleScore> {
        self.rules.iter().map(|rule| rule.evaluate(task)).collect()
    }

    /// The comparator itself.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a);
            let score_b = rule.evaluate(b);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }

        // All rules tied → use final tie-breaker
        match &self.tie_breaker {
            TieBreaker::Stable => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::staffing_order()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
