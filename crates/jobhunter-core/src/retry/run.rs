//! Retry loop: run an async operation until success or policy says stop.

use std::fmt;
use std::future::Future;

use super::policy::{RetryDecision, RetryPolicy};

/// Runs `op` until it succeeds or the retry policy says to stop.
/// On failure, sleeps for the backoff duration then calls `op` again; the last
/// error is returned once retries are exhausted.
pub async fn run_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 0u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => match policy.decide(attempt) {
                RetryDecision::NoRetry => return Err(e),
                RetryDecision::RetryAfter(d) => {
                    tracing::debug!(
                        attempt = attempt + 1,
                        delay_ms = d.as_millis() as u64,
                        error = %e,
                        "attempt failed, backing off"
                    );
                    tokio::time::sleep(d).await;
                    attempt += 1;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Returns an operation that fails `failures` times, then yields the attempt count.
    fn flaky(calls: &AtomicU32, failures: u32) -> impl FnMut() -> std::future::Ready<Result<u32, String>> + '_ {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= failures {
                std::future::ready(Err(format!("failure {n}")))
            } else {
                std::future::ready(Ok(n))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_first_try_without_sleeping() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();
        let out = run_with_retry(&RetryPolicy::default(), flaky(&calls, 0)).await;
        assert_eq!(out, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn accepts_success_after_max_retries_failures() {
        let calls = AtomicU32::new(0);
        let out = run_with_retry(&RetryPolicy::default(), flaky(&calls, 3)).await;
        assert_eq!(out, Ok(4));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries_plus_one_failures() {
        let calls = AtomicU32::new(0);
        let out = run_with_retry(&RetryPolicy::default(), flaky(&calls, 4)).await;
        assert_eq!(out, Err("failure 4".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn waits_exponentially_between_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_jitter: Duration::ZERO,
            ..RetryPolicy::default()
        };
        let start = tokio::time::Instant::now();
        let _ = run_with_retry(&policy, flaky(&calls, 10)).await;
        // 1s + 2s + 4s, no sleep after the final failure.
        assert_eq!(start.elapsed(), Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn separate_calls_do_not_share_attempts() {
        let policy = RetryPolicy::immediate(1);
        let first = AtomicU32::new(0);
        assert!(run_with_retry(&policy, flaky(&first, 1)).await.is_ok());
        let second = AtomicU32::new(0);
        assert!(run_with_retry(&policy, flaky(&second, 1)).await.is_ok());
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }
}
