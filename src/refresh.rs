use std::time::Duration;

/// How a page polls the fingerprint check: first after `initial_delay`, then
/// a fixed interval while checks succeed, multiplied by `backoff` after each
/// failed check, capped at `max_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshPolicy {
    pub initial_delay: Duration,
    pub interval: Duration,
    pub backoff: f64,
    pub max_interval: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            interval: Duration::from_secs(10),
            backoff: 2.0,
            max_interval: Duration::from_secs(300),
        }
    }
}

impl RefreshPolicy {
    /// Delay before the next check, given the delay just used and whether
    /// the check it guarded failed.
    pub fn next_delay(&self, current: Duration, failed: bool) -> Duration {
        if !failed {
            return self.interval;
        }
        current.mul_f64(self.backoff).min(self.max_interval)
    }
}
