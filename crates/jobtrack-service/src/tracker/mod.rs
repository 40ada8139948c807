//! Job metrics tracker.
//!
//! Translates (job, operation) ids into store keys and performs the reads,
//! writes, and increments against the injected `KeyValueStore`. Writes to the
//! several keys of one call are independent; readers can observe one half of
//! a `track_duration` update.

pub mod timer;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Utc};
use serde::Serialize;

use jobtrack_core::key::{metric_name, split_metric_name, AVG_DURATION};
use jobtrack_core::value::{format_timestamp, parse_timestamp};
use jobtrack_core::{JobTrackError, KeySchema, MetricSuffix, MetricValue, Result};

use crate::store::KeyValueStore;

pub use timer::DurationTimer;

/// Metric name -> value, e.g. `compile.total.count -> 2`.
pub type Metrics = BTreeMap<String, MetricValue>;

/// Operation ids ending here would share a metric name with another
/// operation: `x.total` + `count` reads the same as `x` + `total.count`.
const AMBIGUOUS_OP_SUFFIX: &str = ".total";

/// One stored metric of a job: caller-facing name, store key, and the
/// (operation, counter) it belongs to when known.
struct MetricKey {
    name: String,
    key: String,
    counter: Option<(String, MetricSuffix)>,
}

#[derive(Default)]
struct DurationTotals {
    count: Option<MetricValue>,
    duration: Option<MetricValue>,
}

/// Running flag and execution timestamps of one job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatus {
    pub running: bool,
    pub first_executed: Option<NaiveDateTime>,
    pub last_executed: Option<NaiveDateTime>,
}

#[derive(Clone)]
pub struct MetricsTracker {
    store: Arc<dyn KeyValueStore>,
    schema: KeySchema,
}

impl MetricsTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, schema: KeySchema) -> Self {
        Self { store, schema }
    }

    pub fn schema(&self) -> KeySchema {
        self.schema
    }

    /// Record the running flag and stamp execution times.
    ///
    /// `firstExecuted` is written with set-if-absent, so concurrent first
    /// calls cannot overwrite each other.
    pub async fn track_running(&self, job: &str, is_running: bool) -> Result<()> {
        let keys = self.schema.job(job);
        self.store.set(&keys.running, is_running.into()).await?;

        let now = format_timestamp(self.now());
        let first = self
            .store
            .set_if_absent(&keys.first_executed, now.as_str().into())
            .await?;
        self.store.set(&keys.last_executed, now.into()).await?;

        tracing::debug!(job, is_running, first, "tracked running state");
        Ok(())
    }

    /// True only when `true` is stored. Absent or non-boolean values read as
    /// not running.
    pub async fn is_running(&self, job: &str) -> Result<bool> {
        let keys = self.schema.job(job);
        Ok(self
            .store
            .get(&keys.running)
            .await?
            .is_some_and(|v| v.is_true()))
    }

    pub async fn track_duration(&self, job: &str, op: &str, duration_ms: u64) -> Result<()> {
        let delta = i64::try_from(duration_ms).map_err(|_| {
            JobTrackError::BadRequest(format!("duration_ms out of range: {duration_ms}"))
        })?;
        self.check_operation(op)?;
        let keys = self.schema.operation(job, op);

        self.index_operation(job, op).await?;
        self.store.increment(&keys.total_count, 1).await?;
        let total = self.store.increment(&keys.total_duration, delta).await?;

        tracing::debug!(job, op, duration_ms, total, "tracked duration");
        Ok(())
    }

    pub async fn track_count(&self, job: &str, op: &str, count: i64) -> Result<()> {
        self.check_operation(op)?;
        let keys = self.schema.operation(job, op);

        self.index_operation(job, op).await?;
        let total = self.store.increment(&keys.count, count).await?;

        tracing::debug!(job, op, count, total, "tracked count");
        Ok(())
    }

    /// Start timing `op`; report with `DurationTimer::track` or `lap`.
    pub fn start_timer(&self, job: &str, op: &str) -> DurationTimer {
        DurationTimer::new(self.clone(), job, op)
    }

    /// Collect every numeric metric of `job` plus a derived
    /// `<op>.avg.duration` for each operation with a `total.count`.
    pub async fn metrics(&self, job: &str) -> Result<Metrics> {
        let mut metrics = Metrics::new();
        let mut totals: BTreeMap<String, DurationTotals> = BTreeMap::new();

        for entry in self.metric_keys(job).await? {
            let Some(value) = self.store.get(&entry.key).await? else {
                continue;
            };
            let Some(m) = value.as_metric() else {
                tracing::debug!(
                    job,
                    key = %entry.key,
                    kind = value.kind(),
                    "skipping non-numeric value"
                );
                continue;
            };

            if let Some((op, suffix)) = entry.counter {
                match suffix {
                    MetricSuffix::TotalCount => totals.entry(op).or_default().count = Some(m),
                    MetricSuffix::TotalDuration => totals.entry(op).or_default().duration = Some(m),
                    MetricSuffix::Count => {}
                }
            }
            metrics.insert(entry.name, m);
        }

        for (op, t) in totals {
            if let Some(count) = t.count {
                metrics.insert(metric_name(&op, AVG_DURATION), average(t.duration, count));
            }
        }
        Ok(metrics)
    }

    pub async fn first_executed(&self, job: &str) -> Result<Option<NaiveDateTime>> {
        let keys = self.schema.job(job);
        self.read_timestamp(&keys.first_executed).await
    }

    pub async fn last_executed(&self, job: &str) -> Result<Option<NaiveDateTime>> {
        let keys = self.schema.job(job);
        self.read_timestamp(&keys.last_executed).await
    }

    pub async fn job_status(&self, job: &str) -> Result<JobStatus> {
        Ok(JobStatus {
            running: self.is_running(job).await?,
            first_executed: self.first_executed(job).await?,
            last_executed: self.last_executed(job).await?,
        })
    }

    /// Wall clock used for execution timestamps. The legacy layout keeps the
    /// local time its existing writers store; the segmented layout uses UTC.
    fn now(&self) -> NaiveDateTime {
        match self.schema {
            KeySchema::Legacy => Local::now().naive_local(),
            KeySchema::Segmented => Utc::now().naive_utc(),
        }
    }

    fn check_operation(&self, op: &str) -> Result<()> {
        if self.schema == KeySchema::Segmented && op.ends_with(AMBIGUOUS_OP_SUFFIX) {
            return Err(JobTrackError::BadRequest(format!(
                "operation id must not end in \"{AMBIGUOUS_OP_SUFFIX}\": {op}"
            )));
        }
        Ok(())
    }

    async fn index_operation(&self, job: &str, op: &str) -> Result<()> {
        if let Some(index) = self.schema.job(job).index {
            self.store.add_to_set(&index, op).await?;
        }
        Ok(())
    }

    async fn metric_keys(&self, job: &str) -> Result<Vec<MetricKey>> {
        let keys = self.schema.job(job);

        let Some(index) = &keys.index else {
            // legacy layout: scan the keyspace
            let found = self.store.keys(&keys.metric_prefix).await?;
            return Ok(found
                .into_iter()
                .filter_map(|key| {
                    let name = keys.metric_name_of(&key)?;
                    let counter = split_metric_name(&name).map(|(op, s)| (op.to_string(), s));
                    Some(MetricKey { name, key, counter })
                })
                .collect());
        };

        let mut out = Vec::new();
        for op in self.store.set_members(index).await? {
            let op_keys = self.schema.operation(job, &op);
            for suffix in MetricSuffix::ALL {
                out.push(MetricKey {
                    name: metric_name(&op, suffix.as_str()),
                    key: op_keys.get(suffix).to_string(),
                    counter: Some((op.clone(), suffix)),
                });
            }
        }
        Ok(out)
    }

    async fn read_timestamp(&self, key: &str) -> Result<Option<NaiveDateTime>> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(value) => parse_timestamp(key, &value.to_string()).map(Some),
        }
    }
}

/// A zero count is read as 1 and a missing duration as 0, so no division
/// can fail.
fn average(duration: Option<MetricValue>, count: MetricValue) -> MetricValue {
    let duration = duration.map_or(0.0, |d| d.as_f64());
    let count = match count.as_f64() {
        c if c == 0.0 => 1.0,
        c => c,
    };
    MetricValue::Float(duration / count)
}
