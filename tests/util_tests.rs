//! Tests for retry, backoff and timeout handling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use agent_relay::error::RelayError;
use agent_relay::util::retry::{with_timeout, RetryPolicy};

/// Run a policy over an operation that fails `failures` times, recording the
/// paused-clock instant of every attempt.
async fn run_flaky(policy: RetryPolicy, failures: usize) -> (Result<&'static str, RelayError>, Vec<Duration>) {
    let start = Instant::now();
    let attempts = Arc::new(Mutex::new(Vec::new()));
    let log = attempts.clone();

    let result = policy
        .execute(|| {
            let log = log.clone();
            async move {
                let mut log = log.lock().unwrap();
                log.push(start.elapsed());
                if log.len() <= failures {
                    Err(RelayError::transient("flaky"))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

    let attempts = attempts.lock().unwrap().clone();
    (result, attempts)
}

#[tokio::test(start_paused = true)]
async fn two_failures_then_success_records_two_backoff_delays() {
    let policy = RetryPolicy {
        max_retries: 3,
        initial_delay: Duration::from_millis(100),
        backoff_factor: 2.0,
        timeout: None,
    };

    let (result, attempts) = run_flaky(policy, 2).await;

    assert_eq!(result.unwrap(), "ok");
    assert_eq!(
        attempts,
        vec![Duration::ZERO, Duration::from_millis(100), Duration::from_millis(300)]
    );
}

#[tokio::test(start_paused = true)]
async fn zero_retries_fails_without_sleeping() {
    let policy = RetryPolicy {
        max_retries: 0,
        initial_delay: Duration::from_secs(5),
        ..Default::default()
    };
    let start = Instant::now();

    let (result, attempts) = run_flaky(policy, 1).await;

    assert!(matches!(result, Err(RelayError::Transient(_))));
    assert_eq!(attempts.len(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_returns_last_error() {
    let policy = RetryPolicy {
        max_retries: 2,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 1.0,
        timeout: None,
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(RelayError::transient(format!("attempt {attempt}")))
            }
        })
        .await;

    match result {
        Err(RelayError::Transient(message)) => assert_eq!(message, "attempt 2"),
        other => panic!("expected last transient error, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn non_retryable_errors_return_immediately() {
    let policy = RetryPolicy {
        max_retries: 5,
        initial_delay: Duration::from_millis(1),
        ..Default::default()
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(RelayError::InvalidArgument("bad".to_string()))
            }
        })
        .await;

    assert!(matches!(result, Err(RelayError::InvalidArgument(_))));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn timed_out_attempts_are_retried() {
    let policy = RetryPolicy {
        max_retries: 1,
        initial_delay: Duration::from_millis(10),
        backoff_factor: 2.0,
        timeout: Some(Duration::from_millis(50)),
    };
    let attempts = Arc::new(AtomicUsize::new(0));

    let result = policy
        .execute(|| {
            let attempts = attempts.clone();
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
                Ok::<_, RelayError>("second")
            }
        })
        .await;

    assert_eq!(result.unwrap(), "second");
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn with_timeout_reports_elapsed_limit() {
    let result = with_timeout(Duration::from_millis(250), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        Ok::<_, RelayError>(())
    })
    .await;

    match result {
        Err(RelayError::Timeout(ms)) => assert_eq!(ms, 250),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn expired_attempt_is_dropped_before_it_finishes() {
    let finished = Arc::new(AtomicUsize::new(0));
    let flag = finished.clone();

    let result = with_timeout(Duration::from_millis(10), async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        flag.fetch_add(1, Ordering::SeqCst);
        Ok::<_, RelayError>(())
    })
    .await;
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(matches!(result, Err(RelayError::Timeout(10))));
    assert_eq!(finished.load(Ordering::SeqCst), 0);
}

#[test]
fn retryable_set_is_timeout_and_transient() {
    assert!(RelayError::Timeout(1).is_retryable());
    assert!(RelayError::transient("x").is_retryable());
    assert!(!RelayError::tool("search", "nope").is_retryable());
    assert!(!RelayError::ChannelClosed.is_retryable());
}
