use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

use jobtrack_core::{JobTrackError, Result, StoreValue};

use super::KeyValueStore;

/// Process-local store backed by `DashMap`.
///
/// Scalars and sets live in separate maps; a key is expected to be used as
/// one or the other. Per-key atomicity comes from the shard lock held by
/// `entry`.
#[derive(Default)]
pub struct InMemoryStore {
    values: DashMap<String, StoreValue>,
    sets: DashMap<String, DashSet<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            values: DashMap::new(),
            sets: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len() + self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<StoreValue>> {
        Ok(self.values.get(key).map(|r| r.value().clone()))
    }

    async fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: StoreValue) -> Result<bool> {
        match self.values.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(v) => {
                v.insert(value);
                Ok(true)
            }
        }
    }

    async fn increment(&self, key: &str, delta: i64) -> Result<i64> {
        let mut entry = self
            .values
            .entry(key.to_string())
            .or_insert(StoreValue::Int(0));

        match entry.value_mut() {
            StoreValue::Int(v) => {
                *v = v
                    .checked_add(delta)
                    .ok_or_else(|| JobTrackError::Store(format!("increment overflow at {key}")))?;
                Ok(*v)
            }
            other => Err(JobTrackError::Store(format!(
                "value at {key} is {}, not an integer",
                other.kind()
            ))),
        }
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let scalars = self.values.iter().map(|r| r.key().clone());
        let sets = self.sets.iter().map(|r| r.key().clone());
        Ok(scalars.chain(sets).filter(|k| k.starts_with(prefix)).collect())
    }

    async fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        self.sets
            .entry(key.to_string())
            .or_insert_with(DashSet::new)
            .insert(member.to_string());
        Ok(())
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.iter().map(|m| m.key().to_string()).collect())
            .unwrap_or_default())
    }
}
