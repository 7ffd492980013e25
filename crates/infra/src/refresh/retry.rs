//! Retry budget for one tenant's alert dispatch.

use std::time::Duration;

/// Attempts allowed for a single batch, the first one included, and the
/// pause between them. The pause doubles after every failure up to
/// `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRetry {
    pub attempts: u32,
    pub first_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for DispatchRetry {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(500))
    }
}

impl DispatchRetry {
    pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

    pub fn new(attempts: u32, first_backoff: Duration) -> Self {
        Self {
            attempts,
            first_backoff,
            max_backoff: Self::DEFAULT_MAX_BACKOFF.max(first_backoff),
        }
    }

    /// Whether the channel may be called again after `failed` attempts.
    pub fn may_retry(&self, failed: u32) -> bool {
        failed < self.attempts
    }

    /// Pause after the `failed`-th failed attempt (1-indexed).
    pub fn backoff_after(&self, failed: u32) -> Duration {
        let doublings = failed.saturating_sub(1).min(31);
        self.first_backoff
            .checked_mul(1 << doublings)
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }
}
