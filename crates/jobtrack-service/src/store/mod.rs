//! Key-value store seam.
//!
//! The tracker only talks to a store through `KeyValueStore`, so a remote
//! backend can be plugged in by the binary. `InMemoryStore` is the bundled
//! implementation.

pub mod memory;

use async_trait::async_trait;

use jobtrack_core::{Result, StoreValue};

pub use memory::InMemoryStore;

/// Store operations required by the tracker.
///
/// `increment` and `set_if_absent` must be atomic per key. Nothing is
/// promised across keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>>;

    async fn set(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Write only when `key` is absent. Returns true when the value was written.
    async fn set_if_absent(&self, key: &str, value: StoreValue) -> Result<bool>;

    /// Add `delta` to an integer key, creating it at 0 first. Returns the new value.
    async fn increment(&self, key: &str, delta: i64) -> Result<i64>;

    /// All keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;

    async fn add_to_set(&self, key: &str, member: &str) -> Result<()>;

    async fn set_members(&self, key: &str) -> Result<Vec<String>>;
}
