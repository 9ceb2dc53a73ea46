//! Configuration loading and lookup.

mod builder;
mod error;
mod file;
mod frozen;
mod key;
mod loader;
mod parse;
mod source;
mod store;
mod value;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, KeyTruncated, MalformedKind, MalformedLine};
pub use file::FileSource;
pub use frozen::Config;
pub use key::{compose_key, write_key};
pub use loader::LoadReport;
pub use parse::{parse_line, Line};
pub use source::{ConfigSource, DefaultEntry};
pub use store::{ConfigEntry, ConfigStore};
pub use value::parse_u32;
