//! HTTP surface over the tracker.
//!
//! - `/healthz`  : liveness
//! - `/metrics`  : service metrics, Prometheus text format
//! - `/v1/jobs/...` : job status, running flag, counters and durations

pub mod error;
pub mod jobs;
pub mod ops;

pub use error::ApiError;
