use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_secs(5),
        }
    }
}

/// Runs `op` until it succeeds or `max_attempts` calls have failed, sleeping
/// a fixed `delay` after each failure. Returns the last error on exhaustion.
/// `op` receives the 1-based attempt number.
pub async fn retry_fixed<T, E, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Connection attempt {} failed. Retrying in {} seconds...",
                    attempt,
                    policy.delay.as_secs()
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}
