//! Reconnection policy for the resilient socket.

use std::time::Duration;

/// Controls how a dropped socket is re-established.
///
/// Delays double with each consecutive retry, capped at `max_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ksis_lib::socket::ReconnectPolicy;
///
/// let policy = ReconnectPolicy::default()
///     .max_retries(5)
///     .initial_delay(Duration::from_millis(500))
///     .max_delay(Duration::from_secs(10));
///
/// assert_eq!(policy.delay_for(1), Duration::from_millis(500));
/// assert_eq!(policy.delay_for(3), Duration::from_secs(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive retries before giving up.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any delay.
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl ReconnectPolicy {
    /// Never reconnect.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Sets the number of consecutive retries.
    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the delay before the first retry.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.initial_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}
