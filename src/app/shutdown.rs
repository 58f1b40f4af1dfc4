//! Graceful shutdown handling.

use tokio_util::sync::CancellationToken;

/// Shuts down background tasks: stops the progress logger and the rate
/// limiter's replenishment task.
pub async fn shutdown_gracefully(
    cancel: CancellationToken,
    logging_task: Option<tokio::task::JoinHandle<()>>,
    rate_limiter_shutdown: Option<CancellationToken>,
) {
    cancel.cancel();
    if let Some(logging_task) = logging_task {
        let _ = logging_task.await;
    }

    if let Some(shutdown) = rate_limiter_shutdown {
        shutdown.cancel();
    }
}
