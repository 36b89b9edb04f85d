//! Bounded-retry combinator.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::Result;

/// Run `op` up to `max_attempts` times, sleeping `delay` between attempts.
///
/// Returns the first output satisfying `is_done`, or the final attempt's
/// output once the budget is exhausted. Operation errors propagate
/// immediately; `is_done` never sees them. A `max_attempts` of zero is
/// treated as one.
pub async fn retry_until<T, F, Fut, P>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
    mut is_done: P,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    P: FnMut(&T) -> bool,
{
    let max_attempts = max_attempts.max(1);
    let mut last = op().await?;
    let mut attempt = 1;
    while attempt < max_attempts && !is_done(&last) {
        sleep(delay).await;
        last = op().await?;
        attempt += 1;
    }
    Ok(last)
}
