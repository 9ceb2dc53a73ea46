pub mod alloc;
pub mod config;
pub mod log2;

pub use alloc::{SystemAllocator, TextAllocator};
pub use config::{
    Config, ConfigBuilder, ConfigEntry, ConfigError, ConfigSource, ConfigStore, FileSource,
    LoadReport, MalformedKind, MalformedLine,
};
pub use log2::log2_ceil;
