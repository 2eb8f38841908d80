//! Fixed-delay retry for idempotent reads.
//!
//! [`retry_fixed`] re-runs an operation on transient failures (network
//! errors, 5xx, 429) with the same pause between attempts. Application-level
//! errors and malformed bodies are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Returns `true` for errors that are worth retrying after a pause.
///
/// **Retriable:** timeouts, connection failures, other request-level
/// transport errors, HTTP 5xx and 429.
///
/// **Not retriable:** [`ClientError::Api`], [`ClientError::Deserialize`],
/// [`ClientError::InvalidBaseUrl`], and any other 4xx status.
pub(crate) fn is_retriable(err: &ClientError) -> bool {
    match err {
        ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
        ClientError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
        ClientError::Api(_) | ClientError::Deserialize { .. } | ClientError::InvalidBaseUrl { .. } => {
            false
        }
    }
}

/// Runs `operation` up to `max_attempts` times in total, sleeping `delay`
/// between attempts. The last error is returned once attempts run out.
pub(crate) async fn retry_fixed<T, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 1u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient API error, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn server_error() -> ClientError {
        ClientError::UnexpectedStatus {
            status: 503,
            url: "http://localhost/api/stores".to_owned(),
        }
    }

    #[test]
    fn api_error_is_not_retriable() {
        assert!(!is_retriable(&ClientError::Api("Store not found".to_owned())));
    }

    #[test]
    fn client_errors_are_not_retriable_but_server_errors_are() {
        assert!(!is_retriable(&ClientError::UnexpectedStatus {
            status: 404,
            url: String::new()
        }));
        assert!(is_retriable(&ClientError::UnexpectedStatus {
            status: 429,
            url: String::new()
        }));
        assert!(is_retriable(&server_error()));
    }

    #[test]
    fn deserialize_error_is_not_retriable() {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        assert!(!is_retriable(&ClientError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }));
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_fixed(3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ClientError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_fixed(3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                let attempt = c.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    Err(server_error())
                } else {
                    Ok::<u32, ClientError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_fixed(3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(server_error())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3, "3 attempts in total");
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_api_error() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_fixed(3, Duration::ZERO, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(ClientError::Api("Thiếu thông tin".to_owned()))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "Api errors must not be retried");
        assert!(matches!(result, Err(ClientError::Api(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_fixed_delay_between_attempts() {
        let started = tokio::time::Instant::now();
        let _ = retry_fixed(3, Duration::from_millis(1_000), || async {
            Err::<(), _>(server_error())
        })
        .await;
        let elapsed = started.elapsed();
        assert!(
            elapsed >= Duration::from_millis(2_000) && elapsed < Duration::from_millis(3_000),
            "two pauses expected, got {elapsed:?}"
        );
    }
}
