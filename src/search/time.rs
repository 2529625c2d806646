// Wall-clock budget tracking for a single search invocation.
//
// Reading the clock is a syscall, so the deadline is only consulted every
// `check_interval` visited nodes. The interval is a power of two so the
// throttle is a single mask instead of a division.

use std::time::{Duration, Instant};

/// Default node interval between clock checks.
const DEFAULT_CHECK_INTERVAL: u64 = 1024;

/// Budget horizon used when no deadline applies.
const FAR_FUTURE: Duration = Duration::from_secs(3600 * 24);

/// Signal that the time budget ran out mid-search.
///
/// This is control flow, not a failure: it unwinds the recursion without
/// producing a score, and the deepening controller recovers by falling
/// back to the last fully completed iteration. A partially searched
/// subtree never yields a usable value, which is why this is carried in
/// `Result` rather than folded into the score domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchInterrupted;

/// Deadline plus node counter, owned by one search invocation.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    deadline: Instant,
    nodes: u64,
    check_mask: u64,
}

impl SearchBudget {
    /// Budget expiring `limit` from now.
    pub fn new(limit: Duration) -> Self {
        Self::with_check_interval(limit, DEFAULT_CHECK_INTERVAL)
    }

    /// Budget with an explicit clock-check interval (rounded up to a
    /// power of two, minimum 1).
    pub fn with_check_interval(limit: Duration, interval: u64) -> Self {
        let interval = interval.max(1).next_power_of_two();
        Self {
            deadline: Instant::now() + limit,
            nodes: 0,
            check_mask: interval - 1,
        }
    }

    /// Budget that never expires in practice.
    pub fn unlimited() -> Self {
        Self::new(FAR_FUTURE)
    }

    /// Count one visited node; errs if a clock check finds the deadline
    /// passed. Call at every node entry.
    #[inline]
    pub fn visit(&mut self) -> Result<(), SearchInterrupted> {
        self.nodes += 1;
        if self.nodes & self.check_mask == 0 && self.expired() {
            return Err(SearchInterrupted);
        }
        Ok(())
    }

    /// Unthrottled deadline check.
    #[inline]
    pub fn expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Time left before the deadline (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_nodes() {
        let mut budget = SearchBudget::unlimited();
        for _ in 0..10 {
            budget.visit().unwrap();
        }
        assert_eq!(budget.nodes(), 10);
    }

    #[test]
    fn expired_budget_interrupts_on_check_boundary() {
        let mut budget = SearchBudget::with_check_interval(Duration::ZERO, 4);
        assert!(budget.expired());
        // Nodes 1-3 fall between clock checks and pass.
        assert!(budget.visit().is_ok());
        assert!(budget.visit().is_ok());
        assert!(budget.visit().is_ok());
        // Node 4 hits the mask and sees the deadline.
        assert_eq!(budget.visit(), Err(SearchInterrupted));
    }

    #[test]
    fn generous_budget_never_interrupts() {
        let mut budget = SearchBudget::new(Duration::from_secs(60));
        for _ in 0..100_000 {
            assert!(budget.visit().is_ok());
        }
    }

    #[test]
    fn interval_rounds_to_power_of_two() {
        let mut budget = SearchBudget::with_check_interval(Duration::ZERO, 3);
        // Rounded up to 4: third visit still unchecked.
        assert!(budget.visit().is_ok());
        assert!(budget.visit().is_ok());
        assert!(budget.visit().is_ok());
        assert!(budget.visit().is_err());
    }

    #[test]
    fn remaining_shrinks_to_zero_after_deadline() {
        let budget = SearchBudget::new(Duration::ZERO);
        assert_eq!(budget.remaining(), Duration::ZERO);
    }
}
