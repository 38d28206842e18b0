//! # Poll Policies
//!
//! Fixed-interval polling for the two blocking waits of a client run:
//! connecting to the server and waiting for the next frame.
//!
//! The provider is synchronous, so each attempt is a plain closure. Between
//! attempts the loop sleeps on the tokio timer and can be interrupted by a
//! [`Shutdown`] signal. The interval is fixed; it does not grow between
//! attempts.
//!
//! ## Usage
//!
//! ```rust
//! use mocap_stream::poll::{PollPolicy, poll_until};
//! use mocap_stream::Shutdown;
//! use std::time::Duration;
//!
//! let rt = tokio::runtime::Builder::new_current_thread()
//!     .enable_time()
//!     .build()
//!     .unwrap();
//!
//! let mut remaining = 2;
//! let value = rt.block_on(poll_until(
//!     &PollPolicy::unbounded(Duration::from_millis(1)),
//!     &Shutdown::new(),
//!     "countdown",
//!     |_attempt| {
//!         if remaining == 0 {
//!             return Ok(Some(42));
//!         }
//!         remaining -= 1;
//!         Ok(None)
//!     },
//! ));
//!
//! assert_eq!(value.unwrap(), 42);
//! ```

use std::time::{Duration, Instant};

use crate::error::{MocapError, MocapResult};
use crate::shutdown::Shutdown;

/// How often to poll and when to give up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between two attempts.
    pub interval: Duration,

    /// Maximum number of attempts, including the first. 0 means unlimited.
    pub max_attempts: u32,

    /// Overall time budget. `None` means unlimited.
    pub timeout: Option<Duration>,
}

impl PollPolicy {
    /// Poll forever at `interval` (until cancelled).
    #[must_use]
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            max_attempts: 0,
            timeout: None,
        }
    }

    /// Custom policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use mocap_stream::poll::PollPolicy;
    /// use std::time::Duration;
    ///
    /// let policy =
    ///     PollPolicy::custom(Duration::from_millis(200), 50, Some(Duration::from_secs(10)));
    /// assert!(!policy.is_unbounded());
    /// ```
    #[must_use]
    pub fn custom(interval: Duration, max_attempts: u32, timeout: Option<Duration>) -> Self {
        Self {
            interval,
            max_attempts,
            timeout,
        }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.max_attempts == 0 && self.timeout.is_none()
    }

    fn exhausted(&self, attempts: u32, started: Instant) -> bool {
        if self.max_attempts > 0 && attempts >= self.max_attempts {
            return true;
        }
        self.timeout
            .is_some_and(|timeout| started.elapsed() + self.interval > timeout)
    }
}

/// Call `attempt` until it yields a value.
///
/// The closure receives the 1-based attempt number and returns:
/// - `Ok(Some(value))`: done, `value` is returned;
/// - `Ok(None)`: not yet, sleep one interval and try again;
/// - `Err(e)`: abort immediately with `e`.
///
/// # Errors
/// Returns [`MocapError::Cancelled`] when `shutdown` fires, and
/// [`MocapError::TimedOut`] when the policy's attempt or time budget runs
/// out before the next attempt could start.
pub async fn poll_until<T, F>(
    policy: &PollPolicy,
    shutdown: &Shutdown,
    operation: &'static str,
    mut attempt: F,
) -> MocapResult<T>
where
    F: FnMut(u32) -> MocapResult<Option<T>>,
{
    let started = Instant::now();
    let mut attempts: u32 = 0;

    loop {
        if shutdown.is_triggered() {
            return Err(MocapError::Cancelled);
        }

        attempts += 1;
        if let Some(value) = attempt(attempts)? {
            return Ok(value);
        }

        if policy.exhausted(attempts, started) {
            tracing::warn!(operation, attempts, "Giving up");
            return Err(MocapError::TimedOut {
                operation,
                attempts,
            });
        }

        tracing::debug!(
            operation,
            attempt = attempts,
            delay_ms = u64::try_from(policy.interval.as_millis()).unwrap_or(u64::MAX),
            "Not ready, polling again"
        );

        if !shutdown.sleep_or_shutdown(policy.interval).await {
            return Err(MocapError::Cancelled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;

    fn fast(max_attempts: u32) -> PollPolicy {
        PollPolicy::custom(Duration::from_millis(1), max_attempts, None)
    }

    #[tokio::test]
    async fn test_ready_on_first_attempt() {
        let mut calls = 0;
        let result = poll_until(&fast(0), &Shutdown::new(), "test", |_| {
            calls += 1;
            Ok(Some("ready"))
        })
        .await;
        assert_eq!(result.unwrap(), "ready");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_ready_after_misses() {
        let mut seen = Vec::new();
        let result = poll_until(&fast(0), &Shutdown::new(), "test", |attempt| {
            seen.push(attempt);
            Ok((attempt == 4).then_some(attempt))
        })
        .await;
        assert_eq!(result.unwrap(), 4);
        assert_eq!(seen, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_attempt_limit() {
        let mut calls = 0;
        let result: MocapResult<()> = poll_until(&fast(3), &Shutdown::new(), "frame", |_| {
            calls += 1;
            Ok(None)
        })
        .await;

        match result.unwrap_err() {
            MocapError::TimedOut {
                operation,
                attempts,
            } => {
                assert_eq!(operation, "frame");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected TimedOut, got {other:?}"),
        }
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn test_timeout_budget() {
        let policy = PollPolicy::custom(
            Duration::from_millis(5),
            0,
            Some(Duration::from_millis(20)),
        );
        let start = Instant::now();
        let result: MocapResult<()> =
            poll_until(&policy, &Shutdown::new(), "connect", |_| Ok(None)).await;

        assert!(matches!(result.unwrap_err(), MocapError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_error_aborts_immediately() {
        let mut calls = 0;
        let result: MocapResult<()> = poll_until(&fast(10), &Shutdown::new(), "frame", |_| {
            calls += 1;
            Err(ProviderError::NotConnected.into())
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            MocapError::Provider(ProviderError::NotConnected)
        ));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_attempt() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        let mut calls = 0;
        let result: MocapResult<()> = poll_until(&fast(0), &shutdown, "frame", |_| {
            calls += 1;
            Ok(None)
        })
        .await;

        assert!(matches!(result.unwrap_err(), MocapError::Cancelled));
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_cancelled_while_waiting() {
        let shutdown = Shutdown::new();
        let policy = PollPolicy::unbounded(Duration::from_secs(30));
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            trigger.trigger();
        });

        let result: MocapResult<()> = poll_until(&policy, &shutdown, "frame", |_| Ok(None)).await;
        assert!(matches!(result.unwrap_err(), MocapError::Cancelled));
    }

    #[test]
    fn test_policy_constructors() {
        let policy = PollPolicy::unbounded(Duration::from_secs(1));
        assert!(policy.is_unbounded());
        assert_eq!(policy.interval, Duration::from_secs(1));

        let policy =
            PollPolicy::custom(Duration::from_millis(200), 0, Some(Duration::from_secs(2)));
        assert!(!policy.is_unbounded());
        assert_eq!(policy.max_attempts, 0);
    }
}
