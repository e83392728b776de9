//! Per-worker availability during one engine pass.
//!
//! Each worker carries a single `busy_until` watermark for commitments
//! made in this pass. A worker is available for a task iff it has no
//! commitment yet or its watermark is at or before the task start. Commits
//! only ever move the watermark forward, so an accepted interval can never
//! start before an earlier commitment ends: tasks arriving out of start
//! order are refused rather than double-booked.
//!
//! Commitments carried over from earlier runs are seeded as plain
//! intervals. They block only the tasks they overlap and never move the
//! watermark.

use std::collections::HashMap;

use crate::models::WorkerId;

/// Busy-until watermarks for one pass.
#[derive(Debug, Clone, Default)]
pub struct AvailabilityTracker {
    busy_until: HashMap<WorkerId, i64>,
    committed: HashMap<WorkerId, Vec<(i64, i64)>>,
    seeded: HashMap<WorkerId, Vec<(i64, i64)>>,
}

impl AvailabilityTracker {
    /// Creates a tracker with every worker free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `worker`'s watermark admits a task starting at `start_ms`.
    pub fn is_available(&self, worker: &WorkerId, start_ms: i64) -> bool {
        match self.busy_until.get(worker) {
            None => true,
            Some(&until) => until <= start_ms,
        }
    }

    /// Whether `worker` can take `[start_ms, end_ms)`: the watermark admits
    /// it and no seeded interval overlaps it.
    pub fn is_free(&self, worker: &WorkerId, start_ms: i64, end_ms: i64) -> bool {
        self.is_available(worker, start_ms)
            && !self
                .seeded_intervals(worker)
                .iter()
                .any(|&(s, e)| s < end_ms && start_ms < e)
    }

    /// Records `[start_ms, end_ms)` for `worker` and advances its watermark.
    pub fn commit(&mut self, worker: &WorkerId, start_ms: i64, end_ms: i64) {
        let until = self.busy_until.entry(worker.clone()).or_insert(end_ms);
        *until = (*until).max(end_ms);
        self.committed
            .entry(worker.clone())
            .or_default()
            .push((start_ms, end_ms));
    }

    /// Preloads a commitment carried over from an earlier run.
    pub fn seed(&mut self, worker: &WorkerId, start_ms: i64, end_ms: i64) {
        self.seeded
            .entry(worker.clone())
            .or_default()
            .push((start_ms, end_ms));
    }

    /// Current watermark of `worker`, if committed in this pass.
    pub fn busy_until(&self, worker: &WorkerId) -> Option<i64> {
        self.busy_until.get(worker).copied()
    }

    /// Intervals committed to `worker` in this pass, in commit order.
    pub fn intervals(&self, worker: &WorkerId) -> &[(i64, i64)] {
        self.committed.get(worker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Intervals seeded for `worker`.
    pub fn seeded_intervals(&self, worker: &WorkerId) -> &[(i64, i64)] {
        self.seeded.get(worker).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of workers with at least one commitment in this pass.
    pub fn committed_workers(&self) -> usize {
        self.committed.len()
    }

    /// Number of workers with seeded intervals.
    pub fn seeded_workers(&self) -> usize {
        self.seeded.len()
    }
}
