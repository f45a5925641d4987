//! Explicit waits: poll a condition until it holds or time runs out

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::error::{E2eError, E2eResult};

/// Default polling interval, matching WebDriverWait
pub const DEFAULT_POLL: Duration = Duration::from_millis(500);

/// Poll `condition` until it yields `Some`, or fail with a timeout
///
/// An element-not-found error counts as "not yet"; any other error aborts
/// the wait.
pub async fn until<T, F, Fut>(
    timeout: Duration,
    what: &str,
    mut condition: F,
) -> E2eResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = E2eResult<Option<T>>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match condition().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(E2eError::Timeout(format!("{} after {:?}", what, timeout)));
        }
        sleep(DEFAULT_POLL.min(deadline - now)).await;
    }
}
