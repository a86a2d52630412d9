use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::TimingConfig;
use crate::errors::{ProbeError, ProbeResult};
use crate::perception::traits::TraceSource;

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub poll_interval: Duration,
    pub idle_window: Duration,
    pub timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            idle_window: Duration::from_millis(1000),
            timeout: Duration::from_millis(10_000),
        }
    }
}

impl From<&TimingConfig> for SyncConfig {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            poll_interval: timing.poll_interval(),
            idle_window: timing.idle_window(),
            timeout: timing.timeout(),
        }
    }
}

/// Detects new trace output and its subsequent quiescence by watching the
/// trace's byte length.
///
/// Output arrives on the player's own schedule after an input action, so the
/// only signal is the length of the file it appends to. One synchronizer is
/// built per scenario; `last_observed` is the baseline for the next wait.
pub struct TraceSynchronizer {
    source: Arc<dyn TraceSource>,
    config: SyncConfig,
    last_observed: u64,
}

impl TraceSynchronizer {
    pub fn new(source: Arc<dyn TraceSource>, config: SyncConfig) -> Self {
        Self {
            source,
            config,
            last_observed: 0,
        }
    }

    pub fn with_default(source: Arc<dyn TraceSource>) -> Self {
        Self::new(source, SyncConfig::default())
    }

    pub fn last_observed(&self) -> u64 {
        self.last_observed
    }

    pub fn source(&self) -> &Arc<dyn TraceSource> {
        &self.source
    }

    /// Waits until the trace grows past the last observed length, then records
    /// the new length as the baseline.
    pub async fn wait_for_growth(&mut self, timeout: Duration) -> ProbeResult<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let size = self.source.len().await?;
            if size > self.last_observed {
                tracing::debug!(from = self.last_observed, to = size, "trace grew");
                self.last_observed = size;
                return Ok(());
            }
            if size < self.last_observed {
                tracing::warn!(
                    baseline = self.last_observed,
                    size,
                    "trace shrank; assuming it was recreated"
                );
                self.last_observed = size;
            }

            if Instant::now() >= deadline {
                return Err(ProbeError::Timeout {
                    what: "No trace output was received",
                    timeout_ms: duration_ms(timeout),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// Waits until the trace length stays unchanged for a full `idle_window`.
    ///
    /// Any growth seen at the end of a window starts a new window; the number
    /// of restarts is bounded only by `timeout`.
    pub async fn wait_for_idle(&mut self, idle_window: Duration, timeout: Duration) -> ProbeResult<()> {
        let deadline = Instant::now() + timeout;

        self.last_observed = self.source.len().await?;
        tokio::time::sleep(idle_window).await;

        loop {
            let size = self.source.len().await?;
            if size == self.last_observed {
                tracing::debug!(size, "trace is idle");
                return Ok(());
            }
            self.last_observed = size;

            if Instant::now() >= deadline {
                return Err(ProbeError::Timeout {
                    what: "Trace output did not settle",
                    timeout_ms: duration_ms(timeout),
                });
            }
            tokio::time::sleep(idle_window).await;
        }
    }

    /// Waits for new output and then for it to settle, under one deadline.
    pub async fn wait_for_growth_then_idle(&mut self, idle_window: Duration, timeout: Duration) -> ProbeResult<()> {
        let deadline = Instant::now() + timeout;
        self.wait_for_growth(deadline.saturating_duration_since(Instant::now()))
            .await?;
        self.wait_for_idle(idle_window, deadline.saturating_duration_since(Instant::now()))
            .await
    }

    /// [`Self::wait_for_growth_then_idle`] with the configured window and timeout.
    pub async fn settle(&mut self) -> ProbeResult<()> {
        let idle_window = self.config.idle_window;
        let timeout = self.config.timeout;
        self.wait_for_growth_then_idle(idle_window, timeout).await
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
