//! Key derivation: (job, operation, suffix) -> store key.
//!
//! Two layouts are supported:
//! - `Legacy`: `<job>.running` for job keys and
//!   `<job-without-dots>.<op-without-dots>.<suffix>` for metric keys. Distinct
//!   ids can collide once their dots are stripped (`a.b` and `ab`).
//! - `Segmented`: every id is written as `<byte-len>:<id>`, so the encoding is
//!   injective and ids keep their dots. Metric keys are discovered through a
//!   per-job index set instead of a keyspace scan.

use serde::Deserialize;

/// Suffix under which derived averages are reported.
pub const AVG_DURATION: &str = "avg.duration";

/// Layout used to build store keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySchema {
    Legacy,
    #[default]
    Segmented,
}

/// Stored per-operation counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricSuffix {
    TotalCount,
    TotalDuration,
    Count,
}

impl MetricSuffix {
    pub const ALL: [MetricSuffix; 3] = [
        MetricSuffix::TotalCount,
        MetricSuffix::TotalDuration,
        MetricSuffix::Count,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricSuffix::TotalCount => "total.count",
            MetricSuffix::TotalDuration => "total.duration",
            MetricSuffix::Count => "count",
        }
    }
}

/// Caller-facing metric name, e.g. `compile.total.count`.
pub fn metric_name(op: &str, suffix: &str) -> String {
    format!("{op}.{suffix}")
}

/// Split `compile.total.count` into (`compile`, `TotalCount`).
///
/// Longer suffixes are tried first so `x.total.count` is never read as an
/// operation `x.total` with suffix `count`.
pub fn split_metric_name(name: &str) -> Option<(&str, MetricSuffix)> {
    MetricSuffix::ALL.iter().find_map(|s| {
        name.strip_suffix(s.as_str())
            .and_then(|rest| rest.strip_suffix('.'))
            .map(|op| (op, *s))
    })
}

fn strip_dots(id: &str) -> String {
    id.replace('.', "")
}

fn segment(id: &str) -> String {
    format!("{}:{}", id.len(), id)
}

/// Read one `<len>:<id>` segment from the front of `s`.
/// Returns the id and the remainder after it.
fn take_segment(s: &str) -> Option<(&str, &str)> {
    let (len, rest) = s.split_once(':')?;
    let len: usize = len.parse().ok()?;
    if rest.len() < len || !rest.is_char_boundary(len) {
        return None;
    }
    Some(rest.split_at(len))
}

/// Keys describing one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobKeys {
    schema: KeySchema,
    pub running: String,
    pub first_executed: String,
    pub last_executed: String,
    /// Every metric key of this job starts with this.
    pub metric_prefix: String,
    /// Set of operation names (segmented layout only).
    pub index: Option<String>,
}

impl JobKeys {
    /// Map a raw store key back to its caller-facing metric name.
    ///
    /// Legacy keys are returned with the job prefix removed as-is. Segmented
    /// keys are decoded so the operation id reappears with its dots.
    pub fn metric_name_of(&self, key: &str) -> Option<String> {
        let rest = key.strip_prefix(&self.metric_prefix)?;
        match self.schema {
            KeySchema::Legacy => (!rest.is_empty()).then(|| rest.to_string()),
            KeySchema::Segmented => {
                let (op, tail) = take_segment(rest)?;
                let suffix = tail.strip_prefix('.')?;
                Some(metric_name(op, suffix))
            }
        }
    }
}

/// Keys for one (job, operation) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationKeys {
    pub total_count: String,
    pub total_duration: String,
    pub count: String,
}

impl OperationKeys {
    pub fn get(&self, suffix: MetricSuffix) -> &str {
        match suffix {
            MetricSuffix::TotalCount => &self.total_count,
            MetricSuffix::TotalDuration => &self.total_duration,
            MetricSuffix::Count => &self.count,
        }
    }
}

impl KeySchema {
    pub fn job(self, job: &str) -> JobKeys {
        match self {
            KeySchema::Legacy => JobKeys {
                schema: self,
                running: format!("{job}.running"),
                first_executed: format!("{job}.firstExecuted"),
                last_executed: format!("{job}.lastExecuted"),
                metric_prefix: format!("{}.", strip_dots(job)),
                index: None,
            },
            KeySchema::Segmented => {
                let seg = segment(job);
                JobKeys {
                    schema: self,
                    running: format!("{seg}.running"),
                    first_executed: format!("{seg}.firstExecuted"),
                    last_executed: format!("{seg}.lastExecuted"),
                    metric_prefix: format!("{seg}."),
                    index: Some(format!("{seg}.index")),
                }
            }
        }
    }

    pub fn operation(self, job: &str, op: &str) -> OperationKeys {
        let prefix = match self {
            KeySchema::Legacy => format!("{}.{}", strip_dots(job), strip_dots(op)),
            KeySchema::Segmented => format!("{}.{}", segment(job), segment(op)),
        };
        OperationKeys {
            total_count: format!("{prefix}.{}", MetricSuffix::TotalCount.as_str()),
            total_duration: format!("{prefix}.{}", MetricSuffix::TotalDuration.as_str()),
            count: format!("{prefix}.{}", MetricSuffix::Count.as_str()),
        }
    }
}
