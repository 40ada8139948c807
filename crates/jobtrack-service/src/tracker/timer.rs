use tokio::time::Instant;

use jobtrack_core::Result;

use super::MetricsTracker;

/// Measures one operation and reports the elapsed milliseconds as a
/// duration sample.
///
/// - `track` consumes the timer: one sample per timer.
/// - `lap` keeps it: every call reports the full time since start, so laps
///   are cumulative, not per-interval.
pub struct DurationTimer {
    tracker: MetricsTracker,
    job: String,
    op: String,
    started: Instant,
}

impl DurationTimer {
    pub(crate) fn new(tracker: MetricsTracker, job: &str, op: &str) -> Self {
        Self {
            tracker,
            job: job.to_string(),
            op: op.to_string(),
            started: Instant::now(),
        }
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn op(&self) -> &str {
        &self.op
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Report the time since start and keep the timer running.
    pub async fn lap(&self) -> Result<u64> {
        let elapsed = self.elapsed_ms();
        self.tracker.track_duration(&self.job, &self.op, elapsed).await?;
        Ok(elapsed)
    }

    /// Report the time since start and finish.
    pub async fn track(self) -> Result<u64> {
        self.lap().await
    }
}
