// Bounded polling for server-side jobs.
//
// Bundle and enrollment jobs advance status strictly server-side; the
// client only observes them by re-fetching. The loop below is the single
// polling implementation for both families -- callers supply the fetch
// closure and the terminal predicate.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::Error;

/// Polling bounds and timeout behavior.
#[derive(Debug, Clone)]
pub struct PollOptions {
    /// Maximum number of fetches before giving up.
    pub max_attempts: u32,
    /// Sleep between non-terminal attempts.
    pub interval: Duration,
    /// When `true`, budget exhaustion yields [`Error::PollTimeout`]
    /// instead of returning the last non-terminal job. The historical
    /// contract is `false`: callers assert on the returned status.
    pub fail_on_timeout: bool,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(5),
            fail_on_timeout: false,
        }
    }
}

impl PollOptions {
    /// Bounds with the historical (non-erroring) timeout behavior.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            fail_on_timeout: false,
        }
    }

    /// Switch budget exhaustion to a hard [`Error::PollTimeout`].
    pub fn fail_on_timeout(mut self) -> Self {
        self.fail_on_timeout = true;
        self
    }
}

/// Repeatedly invoke `fetch` until `is_terminal` accepts the result or
/// the attempt budget runs out.
///
/// Returns as soon as a fetched job is terminal. On budget exhaustion
/// the last observed job is returned as-is (non-terminal) unless
/// `fail_on_timeout` is set -- checking the status is then the caller's
/// responsibility. Fetch errors propagate immediately and abort polling;
/// this loop never retries a failed fetch.
pub async fn poll_job<J, F, Fut, P>(
    mut fetch: F,
    is_terminal: P,
    options: &PollOptions,
) -> Result<J, Error>
where
    F: FnMut() -> Fut,
    P: Fn(&J) -> bool,
    Fut: Future<Output = Result<J, Error>>,
{
    let mut attempts: u32 = 1;
    let mut last = fetch().await?;

    loop {
        if is_terminal(&last) {
            debug!(attempts, "job reached terminal status");
            return Ok(last);
        }

        if attempts >= options.max_attempts {
            break;
        }

        tokio::time::sleep(options.interval).await;
        last = fetch().await?;
        attempts += 1;
    }

    debug!(attempts, "job still non-terminal after budget");
    if options.fail_on_timeout {
        Err(Error::PollTimeout { attempts })
    } else {
        Ok(last)
    }
}
