//! Bounded polling loop for awaiting a terminal validation result.
//!
//! The external validator normally resolves a record via webhook, but when
//! callbacks are delayed the caller can fall back to re-fetching the record
//! on a fixed interval. [`poll_until_terminal`] expresses that fallback as a
//! single reusable loop: an initial delay, then up to `max_attempts` fetches
//! spaced `interval` apart, stopping immediately when the fetch reports a
//! terminal value. A fetch error aborts the loop instead of retrying
//! indefinitely; exhausting the attempt budget yields a timeout, never an
//! error, and leaves the underlying record untouched.
//!
//! Suspension happens only on the tokio clock, so tests drive the loop with
//! paused time.

use std::future::Future;
use std::time::Duration;

/// Timing budget for one polling session.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first fetch.
    pub initial_delay: Duration,
    /// Delay between consecutive fetches.
    pub interval: Duration,
    /// Maximum number of fetches before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    /// 5 s initial delay, 10 s interval, 30 attempts (~5 minutes total).
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

/// How a polling session ended.
#[derive(Debug, PartialEq)]
pub enum PollOutcome<T> {
    /// The fetch reported a terminal value before the budget ran out.
    Terminal(T),
    /// The attempt budget was exhausted while still non-terminal. The
    /// caller stops waiting; nothing is marked failed on its behalf.
    TimedOut,
    /// A fetch failed; the loop stops rather than retrying forever.
    Aborted(String),
}

/// Poll `fetch` until it yields a terminal value, errors, or the attempt
/// budget is exhausted.
///
/// `fetch` returns `Ok(Some(value))` once the watched resource is terminal,
/// `Ok(None)` while it is still in progress, and `Err` on a fetch failure.
pub async fn poll_until_terminal<T, E, F, Fut>(config: &PollConfig, mut fetch: F) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    E: std::fmt::Display,
{
    tokio::time::sleep(config.initial_delay).await;

    for attempt in 1..=config.max_attempts {
        match fetch().await {
            Ok(Some(value)) => return PollOutcome::Terminal(value),
            Ok(None) => {}
            Err(e) => return PollOutcome::Aborted(e.to_string()),
        }

        if attempt < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    PollOutcome::TimedOut
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    fn fast_config(max_attempts: u32) -> PollConfig {
        PollConfig {
            initial_delay: Duration::from_secs(5),
            interval: Duration::from_secs(10),
            max_attempts,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_on_terminal_value() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let outcome = poll_until_terminal(&fast_config(30), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n >= 3 {
                    Ok::<_, String>(Some("completed"))
                } else {
                    Ok(None)
                }
            }
        })
        .await;

        assert_eq!(outcome, PollOutcome::Terminal("completed"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_attempt_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let start = Instant::now();

        let outcome = poll_until_terminal(&fast_config(4), move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<Option<()>, String>(None) }
        })
        .await;

        assert_eq!(outcome, PollOutcome::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // initial 5s + three 10s gaps between the four attempts
        assert_eq!(start.elapsed(), Duration::from_secs(35));
    }

    #[tokio::test(start_paused = true)]
    async fn aborts_on_fetch_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let outcome: PollOutcome<()> = poll_until_terminal(&fast_config(30), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move {
                if n == 2 {
                    Err("connection reset".to_string())
                } else {
                    Ok(None)
                }
            }
        })
        .await;

        assert_matches!(outcome, PollOutcome::Aborted(ref msg) if msg == "connection reset");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_initial_delay_before_first_fetch() {
        let start = Instant::now();

        let outcome = poll_until_terminal(&fast_config(30), || async {
            Ok::<_, String>(Some(()))
        })
        .await;

        assert_eq!(outcome, PollOutcome::Terminal(()));
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }
}
