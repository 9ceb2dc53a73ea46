//! Read-only view of a fully loaded store.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::builder::ConfigBuilder;
use super::store::{ConfigEntry, ConfigStore};
use super::ConfigError;

/// A frozen configuration.
///
/// Cloning is cheap and clones share the same table. There are no mutators,
/// so a `Config` can be handed to any number of threads once loading is over.
///
/// ## Example
///
/// ```
/// use flatcfg::{Config, ConfigStore};
///
/// let mut store = ConfigStore::new();
/// store.load_from_handle("cache.size = 1<<10\n".as_bytes())?;
/// let config: Config = store.freeze();
///
/// assert_eq!(config.get_u32("cache", "size", 0), 1024);
/// # Ok::<(), flatcfg::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    store: Arc<ConfigStore>,
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Returns the raw value for `(base, name)`.
    pub fn get_string(&self, base: &str, name: &str) -> Option<&str> {
        self.store.get_string(base, name)
    }

    /// Returns the value as a `u32`, or `default` if missing or not numeric.
    pub fn get_u32(&self, base: &str, name: &str, default: u32) -> u32 {
        self.store.get_u32(base, name, default)
    }

    /// Like [`get_u32`](Self::get_u32), but never below a non-zero `default`.
    pub fn get_u32_min(&self, base: &str, name: &str, default: u32) -> u32 {
        self.store.get_u32_min(base, name, default)
    }

    /// Strict lookup that reports missing or non-numeric values.
    pub fn try_get_u32(&self, base: &str, name: &str) -> Result<u32, ConfigError> {
        self.store.try_get_u32(base, name)
    }

    /// Returns `true` if `(base, name)` has a value.
    pub fn contains(&self, base: &str, name: &str) -> bool {
        self.store.contains(base, name)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the configuration has no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Iterates over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> + '_ {
        self.store.iter()
    }
}

impl From<ConfigStore> for Config {
    fn from(store: ConfigStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Serializes as a flat map of composite key to raw value, sorted by key.
impl Serialize for Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted: BTreeMap<&str, &str> =
            self.iter().map(|e| (e.key(), e.value())).collect();
        serializer.collect_map(sorted)
    }
}
