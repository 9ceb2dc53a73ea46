use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::file::FileSource;
use super::frozen::Config;
use super::source::{ConfigSource, DefaultEntry};
use super::{ConfigError, ConfigStore};
use crate::alloc::{self, TextAllocator};

/// Builder for loading configuration from defaults and `name=value` files.
///
/// Sources are applied in registration order, with later sources overriding
/// earlier ones key by key. The result is a frozen, read-only [`Config`].
///
/// ## File format
///
/// ```text
/// # comments start with '#'
/// db.host = localhost
/// db.port = 5432
/// verbose = 1
/// ```
///
/// ## Example
///
/// ```no_run
/// use flatcfg::Config;
///
/// let config = Config::builder()
///     .with_default("db", "port", "5432")
///     .with_file("/etc/app/app.conf", true)
///     .with_file("/etc/app/local.conf", false)
///     .build()?;
///
/// let port = config.get_u32("db", "port", 5432);
/// # Ok::<(), flatcfg::ConfigError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ConfigBuilder {
    sources: Vec<Box<dyn ConfigSource>>,
    allocator: Option<Arc<dyn TextAllocator>>,
    capacity: Option<usize>,
}

impl ConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a config file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are silently skipped.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Sets a value directly. Register defaults before files so the files
    /// can override them.
    pub fn with_default(
        self,
        base: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.with_source(DefaultEntry::new(base, name, value))
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Stores entry text through `allocator` instead of the platform allocator.
    pub fn with_allocator(mut self, allocator: Arc<dyn TextAllocator>) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Sizes the table for roughly `capacity` entries up front.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Loads every source into a fresh store and freezes it.
    ///
    /// Stops at the first source that fails to open or read.
    pub fn build(self) -> Result<Config, ConfigError> {
        Ok(self.into_store()?.freeze())
    }

    /// Like [`build`](Self::build), but leaves the store writable.
    pub fn into_store(self) -> Result<ConfigStore, ConfigError> {
        let allocator = self.allocator.unwrap_or_else(alloc::system);
        let mut store = match self.capacity {
            Some(capacity) => ConfigStore::with_capacity_and_allocator(capacity, allocator),
            None => ConfigStore::with_allocator(allocator),
        };

        for source in &self.sources {
            let report = source.load_into(&mut store)?;
            debug!(
                ?source,
                applied = report.applied,
                skipped = report.malformed.len(),
                "config source applied"
            );
        }

        Ok(store)
    }
}
