use crate::error::{Result, ScrapeError};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fixed delay after each page acquisition, cut short by cancellation.
#[derive(Debug, Clone)]
pub struct Pacer {
    delay: Duration,
    cancel: CancellationToken,
}

impl Pacer {
    pub fn new(delay: Duration, cancel: CancellationToken) -> Self {
        Self { delay, cancel }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub async fn wait(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }
        if self.delay.is_zero() {
            return Ok(());
        }

        debug!(delay_ms = self.delay.as_millis() as u64, "Pacing");
        tokio::select! {
            _ = sleep(self.delay) => Ok(()),
            _ = self.cancel.cancelled() => Err(ScrapeError::Cancelled),
        }
    }
}
