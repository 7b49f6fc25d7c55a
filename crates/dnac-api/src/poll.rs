// Poll-until-terminal-state helper.
//
// Tasks and template deployments run asynchronously on the cluster; the
// only way to observe them is to re-read a status endpoint. This module
// owns the cadence/deadline arithmetic so task waits and deployment waits
// share one loop.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::error::Error;

/// Cadence and deadline for a poll loop.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Delay between status probes.
    pub interval: Duration,
    /// Total time to wait before giving up with [`Error::PollTimeout`].
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
        }
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// Repeatedly invoke `probe` until it yields `Some(value)`, sleeping
/// `policy.interval` between probes.
///
/// `probe` returns `Ok(None)` while the watched job is still running;
/// any `Err` it produces (task failure, transport error) aborts the loop
/// immediately. Exceeding `policy.timeout` maps to [`Error::PollTimeout`].
pub(crate) async fn poll_until<T, F, Fut>(policy: &PollPolicy, mut probe: F) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, Error>>,
{
    let deadline = Instant::now() + policy.timeout;

    loop {
        if let Some(value) = probe().await? {
            return Ok(value);
        }

        if Instant::now() + policy.interval > deadline {
            return Err(Error::PollTimeout {
                waited_secs: policy.timeout.as_secs(),
            });
        }

        trace!("not terminal yet, sleeping {:?}", policy.interval);
        tokio::time::sleep(policy.interval).await;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    async fn probe_counter(calls: &AtomicU32) -> Result<Option<u32>, Error> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok(if n >= 2 { Some(n) } else { None })
    }

    async fn probe_never(calls: &AtomicU32) -> Result<Option<u32>, Error> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }

    async fn probe_error(_calls: &AtomicU32) -> Result<Option<u32>, Error> {
        Err(Error::Api {
            status: 500,
            message: "boom".into(),
        })
    }

    #[tokio::test(start_paused = true)]
    async fn returns_first_terminal_value() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::default();

        let result = poll_until(&policy, || probe_counter(&calls)).await.unwrap();

        assert_eq!(result, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_never_terminal() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::new(Duration::from_secs(1), Duration::from_secs(5));

        let result = poll_until(&policy, || probe_never(&calls)).await;

        assert!(matches!(result, Err(Error::PollTimeout { waited_secs: 5 })));
        assert!(calls.load(Ordering::SeqCst) >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_errors_abort_immediately() {
        let calls = AtomicU32::new(0);
        let policy = PollPolicy::default();

        let result = poll_until(&policy, || probe_error(&calls)).await;

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }
}
