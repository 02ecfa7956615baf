//! Consecutive-failure accounting for the fetch loop.

/// Counts consecutive transient failures; any success resets the count.
/// When the count reaches the limit the loop backs off for a cooldown
/// instead of hammering a struggling server.
#[derive(Debug)]
pub struct ErrorBudget {
    limit: u32,
    consecutive: u32,
}

impl ErrorBudget {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            consecutive: 0,
        }
    }

    /// Records a failure. Returns true when the budget is exhausted and the
    /// caller should enter cooldown.
    pub fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.consecutive >= self.limit
    }

    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// Clears the count after a cooldown completes.
    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_at_limit() {
        let mut budget = ErrorBudget::new(3);
        assert!(!budget.record_failure());
        assert!(!budget.record_failure());
        assert!(budget.record_failure());
    }

    #[test]
    fn test_success_resets_the_streak() {
        let mut budget = ErrorBudget::new(2);
        assert!(!budget.record_failure());
        budget.record_success();
        assert!(!budget.record_failure());
        assert!(budget.record_failure());
    }

    #[test]
    fn test_reset_after_cooldown() {
        let mut budget = ErrorBudget::new(1);
        assert!(budget.record_failure());
        budget.reset();
        assert_eq!(budget.consecutive(), 0);
        assert!(budget.record_failure());
    }
}
