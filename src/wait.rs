use crate::error::CliError;
use std::time::{Duration, Instant};

/// How long-running operations are polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(1800),
        }
    }
}

/// Poll `check` until it reports completion or the timeout elapses.
///
/// `check` always runs at least once, so a zero timeout means "check now".
pub fn wait_until<F>(policy: &WaitPolicy, what: &str, mut check: F) -> Result<(), CliError>
where
    F: FnMut() -> Result<bool, CliError>,
{
    let started = Instant::now();
    let mut attempt = 0u32;

    loop {
        attempt += 1;
        tracing::trace!(what, attempt, "Polling");
        if check()? {
            tracing::debug!(what, attempt, "Wait finished");
            return Ok(());
        }

        let elapsed = started.elapsed();
        if elapsed >= policy.timeout {
            return Err(CliError::WaitTimedOut {
                what: what.to_string(),
                seconds: policy.timeout.as_secs(),
            });
        }

        std::thread::sleep(policy.interval.min(policy.timeout - elapsed));
    }
}
