use crate::config::ReadRetryConfig;
use crate::types::error::AppError;
use std::future::Future;
use tracing::warn;

/// Retries a read on transient connection failures. Never wrap a mutation in this:
/// a transaction may have committed before the failure was observed.
pub async fn retry_read<T, F, Fut>(policy: ReadRetryConfig, mut op: F) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Err(err) if err.is_transient() && attempt < attempts => {
                warn!("Transient read failure (attempt {attempt}/{attempts}): {err}");
                tokio::time::sleep(policy.backoff * attempt).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}
