//! Values held by the key-value store and values reported as metrics.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{JobTrackError, Result};

/// Layout used for `firstExecuted` / `lastExecuted` strings.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A primitive stored under one key.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl StoreValue {
    /// Integer view, used by `increment`. Floats and text are not integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StoreValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view for metric collection. Booleans and text yield `None`.
    pub fn as_metric(&self) -> Option<MetricValue> {
        match self {
            StoreValue::Int(v) => Some(MetricValue::Int(*v)),
            StoreValue::Float(v) => Some(MetricValue::Float(*v)),
            _ => None,
        }
    }

    /// True only for a stored boolean `true`.
    pub fn is_true(&self) -> bool {
        matches!(self, StoreValue::Bool(true))
    }

    /// Short type name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreValue::Bool(_) => "bool",
            StoreValue::Int(_) => "int",
            StoreValue::Float(_) => "float",
            StoreValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Bool(v) => write!(f, "{v}"),
            StoreValue::Int(v) => write!(f, "{v}"),
            StoreValue::Float(v) => write!(f, "{v}"),
            StoreValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for StoreValue {
    fn from(v: bool) -> Self {
        StoreValue::Bool(v)
    }
}

impl From<i64> for StoreValue {
    fn from(v: i64) -> Self {
        StoreValue::Int(v)
    }
}

impl From<String> for StoreValue {
    fn from(v: String) -> Self {
        StoreValue::Text(v)
    }
}

impl From<&str> for StoreValue {
    fn from(v: &str) -> Self {
        StoreValue::Text(v.to_string())
    }
}

/// A metric as returned to callers: raw counters are integers, derived
/// averages are floats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Int(v) => v as f64,
            MetricValue::Float(v) => v,
        }
    }
}

/// Render a timestamp in the stored layout.
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a stored timestamp. `key` is carried into the error for context.
///
/// Writers that drop zero seconds (`2024-05-01T10:15`) are accepted too.
pub fn parse_timestamp(key: &str, raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|e| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").map_err(|_| e))
        .map_err(|source| JobTrackError::MalformedTimestamp {
            key: key.to_string(),
            source,
        })
}
