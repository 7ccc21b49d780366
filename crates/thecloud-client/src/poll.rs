//! Asynchronous completion poller
//!
//! Some deletes are accepted by the control plane before the resource is
//! actually gone. The poller probes until the resource is absent, the
//! deadline passes, the probe fails, or the caller cancels.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::config::PollConfig;
use crate::error::{ClientError, Result};
use crate::transport::Client;

/// Probe until it reports absence.
///
/// The first probe runs immediately, later probes once per interval.
/// Returns [`ClientError::Timeout`] when the deadline passes,
/// [`ClientError::Cancelled`] when `cancel` fires, or the first probe error.
pub async fn wait_until_absent<F, Fut, T>(
    mut probe: F,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let started = Instant::now();
    let deadline = tokio::time::sleep(config.timeout);
    tokio::pin!(deadline);

    let mut ticker = tokio::time::interval(config.interval.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut probes = 0u32;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = &mut deadline => return Err(ClientError::Timeout(config.timeout)),
            _ = ticker.tick() => {}
        }

        probes += 1;
        let observed = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            _ = &mut deadline => return Err(ClientError::Timeout(config.timeout)),
            observed = probe() => observed?,
        };

        match observed {
            None => {
                debug!(
                    "resource absent after {} probe(s) in {:?}",
                    probes,
                    started.elapsed()
                );
                return Ok(());
            }
            Some(_) => trace!("resource still present (probe {})", probes),
        }
    }
}

impl Client {
    /// Poll with this client's [`PollConfig`] and cancellation token
    pub async fn wait_until_absent<F, Fut, T>(&self, probe: F) -> Result<()>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        wait_until_absent(probe, self.poll_config(), self.cancellation()).await
    }
}
