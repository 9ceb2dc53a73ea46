use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("required config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cannot open config file '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config source '{origin}' at line {line}: {source}")]
    Read {
        origin: String,
        line: usize,
        source: std::io::Error,
    },

    #[error("config key not found: {0}")]
    NotFound(String),

    #[error("config value for '{key}' is not an unsigned 32-bit integer: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("allocator refused storage for config key '{0}'")]
    AllocationFailed(String),
}

impl ConfigError {
    /// Returns `true` for failures to open or read a config source.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::Open { .. } | Self::Read { .. }
        )
    }
}

/// Why a line was skipped during a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MalformedKind {
    #[error("missing '=' separator")]
    MissingSeparator,

    #[error("empty key")]
    EmptyKey,

    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// A line the loader skipped. Never aborts a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}: '{text}'")]
pub struct MalformedLine {
    pub line: usize,
    pub kind: MalformedKind,
    pub text: String,
}

/// Returned by [`write_key`](super::write_key) when the composed key does
/// not fit the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("composed key needs {needed} bytes but the buffer holds {capacity}")]
pub struct KeyTruncated {
    pub needed: usize,
    pub capacity: usize,
    /// Bytes of the key actually written.
    pub written: usize,
}
