//! Timeout policy shared by every call a client makes

use std::time::Duration;

/// Timeout budget of a client
///
/// A single budget caps each individual HTTP call and each wait for a job.
/// The policy is read, never consumed: two consecutive waits on the same
/// client each get the full ceiling measured from their own start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    budget: Duration,
    poll_interval: Duration,
}

impl TimeoutPolicy {
    pub const DEFAULT_BUDGET: Duration = Duration::from_secs(55);
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn from_secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    /// Override the pause between two status probes
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Upper bound for a single HTTP call
    pub fn call_timeout(&self) -> Duration {
        self.budget
    }

    /// Upper bound for one wait-for-processed loop
    pub fn poll_ceiling(&self) -> Duration {
        self.budget
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = TimeoutPolicy::default();
        assert_eq!(policy.call_timeout(), Duration::from_secs(55));
        assert_eq!(policy.poll_ceiling(), Duration::from_secs(55));
        assert_eq!(policy.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_budget_caps_calls_and_polls_alike() {
        let policy = TimeoutPolicy::from_secs(3).with_poll_interval(Duration::from_millis(250));
        assert_eq!(policy.call_timeout(), policy.poll_ceiling());
        assert_eq!(policy.poll_interval(), Duration::from_millis(250));
    }
}
