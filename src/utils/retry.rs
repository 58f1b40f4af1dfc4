//! Error retriability, categorization, and retry with backoff.

use anyhow::Error;
use std::future::Future;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::{
    HTTP_STATUS_TOO_MANY_REQUESTS, RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_ATTEMPTS,
    RETRY_MAX_DELAY_SECS,
};
use crate::error_handling::ErrorType;

/// Determines if an error is retriable (should be retried).
///
/// Transient network failures, server errors (5xx) and rate limiting
/// (429) are worth another attempt; client errors (4xx), decode errors
/// and database errors are permanent.
///
/// Uses error chain inspection with downcasting rather than string
/// matching where possible.
pub fn is_retriable_error(error: &Error) -> bool {
    for cause in error.chain() {
        if let Some(reqwest_err) = cause.downcast_ref::<reqwest::Error>() {
            if let Some(status) = reqwest_err.status() {
                let status_code = status.as_u16();

                if status_code == HTTP_STATUS_TOO_MANY_REQUESTS {
                    return true;
                }
                if (400..500).contains(&status_code) {
                    return false;
                }
                if (500..600).contains(&status_code) {
                    return true;
                }
            }

            if reqwest_err.is_timeout() || reqwest_err.is_connect() || reqwest_err.is_request() {
                return true;
            }
            if reqwest_err.is_decode() {
                return false;
            }
        }

        if cause.downcast_ref::<sqlx::Error>().is_some() {
            return false;
        }
        if cause.downcast_ref::<url::ParseError>().is_some() {
            return false;
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return false;
        }
    }

    // Unknown errors might be transient network issues
    true
}

/// Maps a lookup error to its statistics category.
pub fn categorize_places_error(error: &Error) -> ErrorType {
    for cause in error.chain() {
        if let Some(reqwest_err) = cause.downcast_ref::<reqwest::Error>() {
            if let Some(status) = reqwest_err.status() {
                if status.as_u16() == HTTP_STATUS_TOO_MANY_REQUESTS {
                    return ErrorType::PlacesRequestTooManyRequests;
                }
                return ErrorType::PlacesRequestStatusError;
            }
            if reqwest_err.is_timeout() {
                return ErrorType::PlacesRequestTimeout;
            }
            if reqwest_err.is_connect() {
                return ErrorType::PlacesRequestConnectError;
            }
            if reqwest_err.is_decode() {
                return ErrorType::PlacesResponseDecodeError;
            }
        }
        if cause.downcast_ref::<serde_json::Error>().is_some() {
            return ErrorType::PlacesResponseDecodeError;
        }
    }
    ErrorType::PlacesRequestOtherError
}

/// Runs an async operation with capped exponential backoff, retrying only
/// retriable errors up to `RETRY_MAX_ATTEMPTS` total attempts.
pub async fn retry_with_backoff<T, F, Fut>(mut operation: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    // from_millis exponentiates its base, so feed it the growth factor and
    // scale by the initial delay: 1s, 2s, 4s, ... capped at the max delay
    let strategy = ExponentialBackoff::from_millis(RETRY_FACTOR)
        .factor(RETRY_INITIAL_DELAY_MS / RETRY_FACTOR)
        .max_delay(std::time::Duration::from_secs(RETRY_MAX_DELAY_SECS))
        .take(RETRY_MAX_ATTEMPTS - 1);

    let mut last_error: Option<Error> = None;
    for (attempt, delay) in std::iter::once(std::time::Duration::ZERO)
        .chain(strategy)
        .enumerate()
    {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if !is_retriable_error(&e) {
                    return Err(e);
                }
                log::debug!("Attempt {} failed (retriable): {e:#}", attempt + 1);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow::anyhow!("retry loop produced no error")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_is_retriable_error_database() {
        let db_err = sqlx::Error::PoolClosed;
        let err: anyhow::Error = db_err.into();
        assert!(!is_retriable_error(&err));
    }

    #[test]
    fn test_is_retriable_error_database_wrapped() {
        let db_err = sqlx::Error::PoolClosed;
        let err: anyhow::Error = db_err.into();
        let wrapped = err.context("Additional context");
        assert!(!is_retriable_error(&wrapped));
    }

    #[test]
    fn test_is_retriable_error_url_parse() {
        let err: anyhow::Error = url::ParseError::EmptyHost.into();
        assert!(!is_retriable_error(&err));
    }

    #[test]
    fn test_is_retriable_error_json_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: anyhow::Error = json_err.into();
        assert!(!is_retriable_error(&err));
    }

    #[test]
    fn test_is_retriable_error_unknown_defaults_to_retry() {
        let err = anyhow::anyhow!("Some unknown error");
        assert!(is_retriable_error(&err));
    }

    #[test]
    fn test_categorize_json_error_as_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: anyhow::Error = json_err.into();
        assert_eq!(
            categorize_places_error(&err),
            ErrorType::PlacesResponseDecodeError
        );
    }

    #[test]
    fn test_categorize_unknown_error() {
        let err = anyhow::anyhow!("mystery");
        assert_eq!(
            categorize_places_error(&err),
            ErrorType::PlacesRequestOtherError
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_succeeds_after_transient_failures() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result: Result<u32, _> = retry_with_backoff(move || {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(anyhow::anyhow!("transient"))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_stops_on_permanent_error() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result: Result<u32, _> = retry_with_backoff(move || {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(anyhow::Error::from(sqlx::Error::PoolClosed))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
