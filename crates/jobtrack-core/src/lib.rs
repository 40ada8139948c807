//! jobtrack core: error types, stored value model, and key derivation.
//!
//! This crate defines the contracts shared by the tracker, the store
//! implementations, and the HTTP surface. It carries no runtime or transport
//! dependencies so the key layout can be reused by other tooling that reads
//! the same store.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `JobTrackError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod key;
pub mod value;

/// Shared result type.
pub use error::{JobTrackError, Result};
pub use key::{JobKeys, KeySchema, MetricSuffix, OperationKeys};
pub use value::{MetricValue, StoreValue};
