use std::collections::VecDeque;
use crate::models::OrchestratorReport;

/// Bounded FIFO of past batch reports. Oldest reports are evicted once
/// the ring is at capacity; insertion order is batch completion order.
#[derive(Debug)]
pub struct ExecutionHistory {
    reports: VecDeque<OrchestratorReport>,
    capacity: usize,
}

impl ExecutionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            reports: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, report: OrchestratorReport) {
        if self.reports.len() == self.capacity {
            self.reports.pop_front();
        }
        self.reports.push_back(report);
    }

    /// The newest `limit` reports, oldest first. Callers get clones, so
    /// later eviction cannot invalidate what they hold.
    pub fn recent(&self, limit: usize) -> Vec<OrchestratorReport> {
        let skip = self.reports.len().saturating_sub(limit);
        self.reports.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn contains(&self, execution_id: &str) -> bool {
        self.reports.iter().any(|r| r.execution_id == execution_id)
    }
}
