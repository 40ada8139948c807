//! jobtrack service library entry.
//!
//! Wires the key-value store, the metrics tracker, config, and the HTTP
//! surface. Consumed by the binary (`main.rs`), by integration tests, and by
//! applications that embed the tracker directly.

pub mod app_state;
pub mod config;
pub mod http;
pub mod obs;
pub mod router;
pub mod store;
pub mod tracker;

pub use store::{InMemoryStore, KeyValueStore};
pub use tracker::{DurationTimer, JobStatus, Metrics, MetricsTracker};
