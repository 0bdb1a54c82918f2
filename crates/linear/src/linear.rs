//! Byte-budgeted container with stack, queue and key access
//!
//! Three synchronization domains back a [`Linear`]:
//!
//! - values live in a [`ValueStore`], internally synchronized per shard
//! - the running byte total sits behind its own `RwLock`
//! - the insertion order sits behind another `RwLock`
//!
//! Writers acquire them in a fixed order: the size guard, then the order
//! guard, with value-store calls made while both are held and never holding a
//! store guard across another acquisition. Readers take at most one shared
//! guard. Eviction runs between lock scopes, one removal at a time, so a push
//! that must make room never waits on itself.

use crate::config::LinearConfig;
use crate::errors::{LinearError, Result};
use crate::index;
use crate::size::{estimate, EstimateSize};
use crate::stats::{LinearStats, LinearStatsSnapshot};
use crate::store::ValueStore;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};

/// A key/value pair removed from the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    pub key: String,
    pub value: V,
}

/// Thread-safe ordered container bounded by an estimated byte budget.
///
/// Entries are kept in insertion order: [`pop`](Self::pop) removes the newest,
/// [`take`](Self::take) the oldest, and [`get`](Self::get) /
/// [`read`](Self::read) address an entry by key. The size of every entry is
/// estimated through [`EstimateSize`]; values must report the same estimate for
/// as long as they are stored.
///
/// ```
/// use linear::Linear;
///
/// let linear = Linear::new(1024, false)?;
/// linear.push("1", "a".to_string())?;
/// linear.push("2", "b".to_string())?;
///
/// assert_eq!(linear.pop()?.value, "b");
/// assert_eq!(linear.take()?.value, "a");
/// assert!(linear.is_empty());
/// # Ok::<(), linear::LinearError>(())
/// ```
pub struct Linear<V> {
    values: ValueStore<V>,
    keys: RwLock<VecDeque<String>>,
    size: RwLock<u64>,
    capacity: AtomicU64,
    evict_on_overflow: bool,
    stats: LinearStats,
}

impl<V: EstimateSize> Linear<V> {
    /// Create a container with a byte budget of `capacity_bytes`.
    ///
    /// With `evict_on_overflow` set, pushes that exceed the budget drop the
    /// oldest entries; otherwise they fail with
    /// [`LinearError::InsufficientCapacity`].
    pub fn new(capacity_bytes: u64, evict_on_overflow: bool) -> Result<Self> {
        Self::from_config(&LinearConfig::new(capacity_bytes, evict_on_overflow))
    }

    /// Create a container from a configuration, validating it first
    pub fn from_config(config: &LinearConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            capacity_bytes = config.capacity_bytes,
            evict_on_overflow = config.evict_on_overflow,
            "Created container"
        );

        Ok(Self {
            values: ValueStore::new(),
            keys: RwLock::new(VecDeque::with_capacity(16)),
            size: RwLock::new(0),
            capacity: AtomicU64::new(config.capacity_bytes),
            evict_on_overflow: config.evict_on_overflow,
            stats: LinearStats::default(),
        })
    }

    /// Store `value` under `key`.
    ///
    /// A new key is appended as the newest entry. An existing key keeps its
    /// position and only has its value replaced.
    pub fn push(&self, key: impl Into<String>, value: V) -> Result<()> {
        const OP: &str = "push";

        let key = key.into();
        validate_entry(OP, &key, &value)?;

        let cost = estimate(&key, &value);
        loop {
            {
                let mut size = self.size.write();
                let mut keys = self.keys.write();

                let capacity = self.capacity();
                if cost > capacity {
                    return Err(self.reject(OP, cost, capacity));
                }

                let previous = self.values.inspect(&key, |old| estimate(&key, old));
                let projected = size.saturating_sub(previous.unwrap_or(0)) + cost;

                if projected <= capacity {
                    tracing::trace!(key = %key, cost, replaced = previous.is_some(), "Pushed entry");
                    self.values.store(key.clone(), value);
                    if previous.is_some() {
                        LinearStats::record(&self.stats.replacements);
                    } else {
                        keys.push_back(key);
                        LinearStats::record(&self.stats.pushes);
                    }
                    *size = projected;
                    return Ok(());
                }

                if !self.evict_on_overflow {
                    let delta = cost.saturating_sub(previous.unwrap_or(0));
                    return Err(self.reject(OP, delta, capacity.saturating_sub(*size)));
                }

                if keys.is_empty() {
                    tracing::warn!(
                        key = %key,
                        cost,
                        capacity,
                        "Eviction drained the container without making room"
                    );
                    return Err(self.reject(OP, cost, capacity.saturating_sub(*size)));
                }
            }

            self.evict_oldest()?;
        }
    }

    /// Remove and return the newest entry
    pub fn pop(&self) -> Result<Entry<V>> {
        let (entry, _) = self.remove_where("pop", |keys| Ok(keys.len() - 1))?;
        LinearStats::record(&self.stats.removals);
        Ok(entry)
    }

    /// Remove and return the oldest entry
    pub fn take(&self) -> Result<Entry<V>> {
        let (entry, _) = self.remove_where("take", |_| Ok(0))?;
        LinearStats::record(&self.stats.removals);
        Ok(entry)
    }

    /// Remove and return the value stored under `key`, wherever it sits
    pub fn get(&self, key: &str) -> Result<V> {
        const OP: &str = "get";

        validate_key(OP, key)?;
        let (entry, _) = self.remove_where(OP, |keys| {
            index::find_index(keys, key).ok_or_else(|| LinearError::KeyNotFound {
                operation: OP,
                key: key.to_string(),
            })
        })?;
        LinearStats::record(&self.stats.removals);
        Ok(entry.value)
    }

    /// Replace the value of an existing key, keeping its position
    pub fn update(&self, key: &str, value: V) -> Result<()> {
        const OP: &str = "update";

        validate_entry(OP, key, &value)?;

        let mut size = self.size.write();
        let keys = self.keys.read();
        if keys.is_empty() {
            return Err(LinearError::EmptyContainer { operation: OP });
        }

        let cost = estimate(key, &value);
        let capacity = self.capacity();
        if cost > capacity {
            return Err(self.reject(OP, cost, capacity));
        }

        let previous = self
            .values
            .inspect(key, |old| estimate(key, old))
            .ok_or_else(|| LinearError::KeyNotFound {
                operation: OP,
                key: key.to_string(),
            })?;

        self.values.store(key.to_string(), value);
        *size = size.saturating_sub(previous) + cost;
        LinearStats::record(&self.stats.updates);
        tracing::trace!(key, previous, cost, "Updated entry");
        Ok(())
    }

    /// Estimated cost of the entry under `key`, if present
    pub fn exists(&self, key: &str) -> Option<u64> {
        self.values.inspect(key, |value| estimate(key, value))
    }

    /// Removes the oldest entry to make room for a push
    fn evict_oldest(&self) -> Result<()> {
        match self.remove_where("take", |_| Ok(0)) {
            Ok((entry, cost)) => {
                LinearStats::record(&self.stats.evictions);
                tracing::debug!(key = %entry.key, freed_bytes = cost, "Evicted oldest entry");
                Ok(())
            }
            // raced with another remover; the push loop re-checks the budget
            Err(e) if e.is_empty_container() => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Removes the entry at the position chosen by `locate`, returning it
    /// with its cost.
    fn remove_where<F>(&self, operation: &'static str, locate: F) -> Result<(Entry<V>, u64)>
    where
        F: FnOnce(&VecDeque<String>) -> Result<usize>,
    {
        let mut size = self.size.write();
        let mut keys = self.keys.write();
        if keys.is_empty() {
            return Err(LinearError::EmptyContainer { operation });
        }

        let position = locate(&keys)?;
        let key = index::remove_at(&mut keys, position).ok_or(LinearError::EmptyContainer {
            operation,
        })?;
        let value = self
            .values
            .delete(&key)
            .ok_or_else(|| LinearError::KeyNotFound {
                operation,
                key: key.clone(),
            })?;

        let cost = estimate(&key, &value);
        *size = size.saturating_sub(cost);
        tracing::trace!(operation, key = %key, cost, "Removed entry");

        Ok((Entry { key, value }, cost))
    }

    fn reject(&self, operation: &'static str, requested: u64, available: u64) -> LinearError {
        LinearStats::record(&self.stats.rejections);
        tracing::warn!(
            operation,
            requested_bytes = requested,
            available_bytes = available,
            "Rejected write for lack of capacity"
        );
        LinearError::InsufficientCapacity {
            operation,
            requested_bytes: requested,
            available_bytes: available,
        }
    }
}

impl<V: EstimateSize + Clone> Linear<V> {
    /// Return a copy of the value under `key` without removing it
    pub fn read(&self, key: &str) -> Result<V> {
        const OP: &str = "read";

        validate_key(OP, key)?;
        if self.is_empty() {
            return Err(LinearError::EmptyContainer { operation: OP });
        }

        match self.values.load(key) {
            Some(value) => {
                LinearStats::record(&self.stats.read_hits);
                Ok(value)
            }
            None => {
                LinearStats::record(&self.stats.read_misses);
                Err(LinearError::KeyNotFound {
                    operation: OP,
                    key: key.to_string(),
                })
            }
        }
    }

    /// Visit every entry until `visit` breaks.
    ///
    /// Iteration order is unspecified and unrelated to insertion order.
    /// Entries pushed or removed while the walk is in progress may or may not
    /// be seen. `visit` runs without any container lock held and may call
    /// back into the container.
    pub fn range<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &V) -> ControlFlow<()>,
    {
        for key in self.values.keys() {
            let Some(value) = self.values.load(&key) else {
                continue;
            };
            if visit(&key, &value).is_break() {
                break;
            }
        }
    }
}

impl<V> Linear<V> {
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Number of live entries
    pub fn key_count(&self) -> usize {
        self.keys.read().len()
    }

    pub fn len(&self) -> usize {
        self.key_count()
    }

    /// Snapshot of the keys from oldest to newest
    pub fn keys(&self) -> Vec<String> {
        self.keys.read().iter().cloned().collect()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity.load(Ordering::Acquire)
    }

    /// Sum of the estimated costs of all live entries
    pub fn current_size(&self) -> u64 {
        *self.size.read()
    }

    /// Change the byte budget.
    ///
    /// Entries already stored are kept even when they exceed the new budget;
    /// the next push evicts or fails as usual.
    pub fn set_capacity(&self, capacity_bytes: u64) -> Result<()> {
        if capacity_bytes == 0 {
            return Err(LinearError::invalid_argument(
                "set_capacity",
                "capacity must be greater than 0",
            ));
        }

        let previous = self.capacity.swap(capacity_bytes, Ordering::AcqRel);
        tracing::debug!(previous, capacity_bytes, "Changed container capacity");
        Ok(())
    }

    pub fn evict_on_overflow(&self) -> bool {
        self.evict_on_overflow
    }

    pub fn stats(&self) -> LinearStatsSnapshot {
        self.stats.snapshot()
    }
}

impl<V> fmt::Debug for Linear<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linear")
            .field("capacity", &self.capacity())
            .field("current_size", &self.current_size())
            .field("key_count", &self.key_count())
            .field("evict_on_overflow", &self.evict_on_overflow)
            .finish()
    }
}

fn validate_key(operation: &'static str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(LinearError::invalid_argument(operation, "key must not be empty"));
    }
    Ok(())
}

fn validate_entry<V: EstimateSize + ?Sized>(
    operation: &'static str,
    key: &str,
    value: &V,
) -> Result<()> {
    validate_key(operation, key)?;
    if value.is_absent() {
        return Err(LinearError::invalid_argument(operation, "value must not be absent"));
    }
    Ok(())
}
