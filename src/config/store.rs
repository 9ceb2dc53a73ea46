//! The in-memory table of record.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::frozen::Config;
use super::key::compose_key;
use super::value::parse_u32;
use super::ConfigError;
use crate::alloc::{self, TextAllocator, TextBlock};
use crate::log2::log2_ceil;

const DEFAULT_CAPACITY: usize = 32;

/// A single resolved setting.
///
/// Entries hash and compare by key only, so the table can be searched
/// with a plain `&str`.
#[derive(Debug)]
pub struct ConfigEntry {
    text: TextBlock,
}

impl ConfigEntry {
    /// The composite key (`base.name`, or `name` for flat entries).
    pub fn key(&self) -> &str {
        self.text.key()
    }

    /// The raw, untyped value.
    pub fn value(&self) -> &str {
        self.text.value()
    }
}

impl PartialEq for ConfigEntry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ConfigEntry {}

impl Hash for ConfigEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Borrow<str> for ConfigEntry {
    fn borrow(&self) -> &str {
        self.key()
    }
}

/// Owning table of config entries keyed by composite key.
///
/// Writes need `&mut self`; call [`freeze`](Self::freeze) once loading is
/// done to get a shareable, read-only [`Config`].
///
/// Entry text is stored through the store's [`TextAllocator`].
pub struct ConfigStore {
    entries: HashSet<ConfigEntry>,
    allocator: Arc<dyn TextAllocator>,
}

impl ConfigStore {
    /// Creates an empty store backed by the platform allocator.
    pub fn new() -> Self {
        Self::with_capacity_and_allocator(DEFAULT_CAPACITY, alloc::system())
    }

    /// Creates an empty store whose entry text goes through `allocator`.
    pub fn with_allocator(allocator: Arc<dyn TextAllocator>) -> Self {
        Self::with_capacity_and_allocator(DEFAULT_CAPACITY, allocator)
    }

    /// Creates an empty store sized for roughly `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_allocator(capacity, alloc::system())
    }

    /// Sized for `capacity` entries, rounded up to a power of two, and
    /// backed by `allocator`.
    pub fn with_capacity_and_allocator(
        capacity: usize,
        allocator: Arc<dyn TextAllocator>,
    ) -> Self {
        Self {
            entries: HashSet::with_capacity(table_capacity(capacity)),
            allocator,
        }
    }

    /// Sets `(base, name)` to `value`, replacing any previous value.
    ///
    /// If the allocator refuses the storage the entry is dropped and a
    /// warning is logged; use [`try_set`](Self::try_set) to observe that.
    pub fn set(&mut self, base: &str, name: &str, value: &str) {
        if let Err(err) = self.try_set(base, name, value) {
            warn!(error = %err, "dropping config entry");
        }
    }

    /// Like [`set`](Self::set), but reports allocation failure.
    pub fn try_set(&mut self, base: &str, name: &str, value: &str) -> Result<(), ConfigError> {
        let key = compose_key(base, name);
        let text = TextBlock::new(&self.allocator, &key, value)
            .ok_or_else(|| ConfigError::AllocationFailed(key.clone().into_owned()))?;
        self.entries.replace(ConfigEntry { text });
        Ok(())
    }

    /// Returns the raw value stored for `(base, name)`.
    pub fn get_string(&self, base: &str, name: &str) -> Option<&str> {
        let key = compose_key(base, name);
        trace!(key = %key, "config lookup");
        let value = self.find(&key).map(ConfigEntry::value);
        if let Some(value) = value {
            debug!(key = %key, value, "config value found");
        }
        value
    }

    /// Returns the value for `(base, name)` as a `u32`, or `default` if it is
    /// missing or not a valid unsigned integer.
    pub fn get_u32(&self, base: &str, name: &str, default: u32) -> u32 {
        let key = compose_key(base, name);
        trace!(key = %key, default, "config lookup");
        let Some(text) = self.find(&key).map(ConfigEntry::value) else {
            return default;
        };
        match parse_u32(text) {
            Some(value) => {
                debug!(key = %key, value, "config value found");
                value
            }
            None => {
                debug!(
                    key = %key,
                    text,
                    default,
                    "config value is not a u32, using default"
                );
                default
            }
        }
    }

    /// Like [`get_u32`](Self::get_u32), but never returns less than a
    /// non-zero `default`.
    pub fn get_u32_min(&self, base: &str, name: &str, default: u32) -> u32 {
        let value = self.get_u32(base, name, default);
        if default == 0 || value > default {
            value
        } else {
            default
        }
    }

    /// Strict counterpart of [`get_u32`](Self::get_u32).
    pub fn try_get_u32(&self, base: &str, name: &str) -> Result<u32, ConfigError> {
        let key = compose_key(base, name);
        let text = self
            .find(&key)
            .map(ConfigEntry::value)
            .ok_or_else(|| ConfigError::NotFound(key.clone().into_owned()))?;
        parse_u32(text).ok_or_else(|| ConfigError::InvalidNumber {
            key: key.into_owned(),
            value: text.to_owned(),
        })
    }

    /// Returns `true` if `(base, name)` has a value.
    pub fn contains(&self, base: &str, name: &str) -> bool {
        self.find(&compose_key(base, name)).is_some()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigEntry> + '_ {
        self.entries.iter()
    }

    /// Ends the write phase.
    pub fn freeze(self) -> Config {
        Config::from(self)
    }

    fn find(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}

fn table_capacity(capacity: usize) -> usize {
    let wanted = capacity.clamp(1, 1 << 20);
    // `wanted` fits in u32 after the clamp.
    1 << log2_ceil(wanted as u32)
}
