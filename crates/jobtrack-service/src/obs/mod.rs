//! In-process service metrics.
//!
//! Counts tracker calls and their latency per operation and renders them in
//! Prometheus text format at `/metrics`. These describe the service itself,
//! not the job metrics it stores.

pub mod metrics;
