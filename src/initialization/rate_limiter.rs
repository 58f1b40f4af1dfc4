//! Token-bucket rate limiter for outbound provider requests.

use std::sync::Arc;
use tokio::sync::Semaphore as TokioSemaphore;
use tokio::time::{interval, Duration as TokioDuration};

/// Token-bucket rate limiter.
///
/// Tokens are replenished continuously at the configured rate by a
/// background task, never beyond the burst capacity; each request consumes
/// one token and blocks when none are available. Shut down cooperatively
/// via the returned `CancellationToken`.
pub struct RateLimiter {
    permits: Arc<TokioSemaphore>,
    rps: u32,
}

impl RateLimiter {
    /// Takes one token, waiting for replenishment when the bucket is empty.
    pub async fn acquire(&self) {
        // The semaphore is never closed. forget() consumes the token;
        // letting the permit drop would hand it straight back.
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }

    /// The configured requests-per-second rate.
    pub fn rps(&self) -> u32 {
        self.rps
    }
}

/// Initializes the rate limiter.
///
/// Returns `None` when `rps` is 0 (rate limiting disabled). The
/// cancellation token stops the background replenishment task.
pub fn init_rate_limiter(
    rps: u32,
    burst: usize,
) -> Option<(Arc<RateLimiter>, tokio_util::sync::CancellationToken)> {
    if rps == 0 {
        return None;
    }
    let burst = burst.max(1);
    let shutdown = tokio_util::sync::CancellationToken::new();
    let shutdown_clone = shutdown.clone();

    let limiter = Arc::new(RateLimiter {
        permits: Arc::new(TokioSemaphore::new(burst)),
        rps,
    });

    let permits = limiter.permits.clone();
    let mut ticker = interval(TokioDuration::from_millis(100));
    tokio::spawn(async move {
        let mut last_time = tokio::time::Instant::now();
        // Carry the fractional remainder so low rates still add up to rps/sec
        let mut fractional_permits = 0.0f64;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = tokio::time::Instant::now();
                    let elapsed = now.duration_since(last_time);

                    let permits_to_add_f64 = rps as f64 * elapsed.as_secs_f64() + fractional_permits;
                    let permits_to_add = permits_to_add_f64 as u32;
                    fractional_permits = permits_to_add_f64 - permits_to_add as f64;

                    // Cap at burst capacity so an idle bucket cannot
                    // accumulate an unbounded backlog of tokens
                    let headroom = burst.saturating_sub(permits.available_permits());
                    let to_add = (permits_to_add as usize).min(headroom);
                    if to_add > 0 {
                        permits.add_permits(to_add);
                    }

                    last_time = now;
                }
                _ = shutdown_clone.cancelled() => {
                    log::debug!("Rate limiter background task shutting down");
                    break;
                }
            }
        }
    });

    Some((limiter, shutdown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_init_rate_limiter_disabled() {
        let result = init_rate_limiter(0, 10);
        assert!(result.is_none(), "limiter should be disabled when RPS is 0");
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_blocks_after_burst_then_replenishes() {
        let (limiter, _shutdown) = init_rate_limiter(10, 2).unwrap();
        assert_eq!(limiter.rps(), 10);

        // Burst capacity is available immediately
        for _ in 0..2 {
            timeout(Duration::from_millis(5), limiter.acquire())
                .await
                .expect("burst permit should be available");
        }

        // Burst spent: the next acquire must block until the ticker runs
        let blocked = timeout(Duration::from_millis(50), limiter.acquire()).await;
        assert!(blocked.is_err(), "acquire must block once the burst is spent");

        // At 10 rps the 100ms ticker adds a token on its next pass
        timeout(Duration::from_millis(200), limiter.acquire())
            .await
            .expect("token should be replenished");
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_acquires_respect_the_configured_rate() {
        let (limiter, _shutdown) = init_rate_limiter(1, 1).unwrap();

        let start = tokio::time::Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        // One immediate token, then one per second
        assert!(
            start.elapsed() >= Duration::from_millis(1900),
            "3 acquires at 1 rps finished in {:?}",
            start.elapsed()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_bucket_does_not_accumulate_beyond_burst() {
        let (limiter, _shutdown) = init_rate_limiter(10, 2).unwrap();

        // Idle long enough for an uncapped bucket to pile up ~50 tokens
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut immediate = 0;
        while timeout(Duration::from_millis(1), limiter.acquire())
            .await
            .is_ok()
        {
            immediate += 1;
            if immediate > 10 {
                break;
            }
        }
        // Burst capacity plus at most one tick's worth of replenishment
        assert!(
            immediate <= 3,
            "idle bucket accumulated {immediate} tokens beyond the burst capacity"
        );
    }

    #[tokio::test]
    async fn test_rate_limiter_shutdown_does_not_panic() {
        let (limiter, shutdown) = init_rate_limiter(10, 5).unwrap();
        shutdown.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = timeout(Duration::from_millis(10), limiter.acquire()).await;
    }
}
