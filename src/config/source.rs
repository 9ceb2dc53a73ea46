use std::io::{self, BufRead};

use super::loader::LoadReport;
use super::{ConfigError, ConfigStore};

/// A source of entries applied by [`ConfigBuilder`](super::ConfigBuilder).
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    /// Writes this source's entries into `store`.
    fn load_into(&self, store: &mut ConfigStore) -> Result<LoadReport, ConfigError>;
}

/// A single programmatic entry, typically a default applied before files.
#[derive(Debug, Clone)]
pub struct DefaultEntry {
    base: String,
    name: String,
    value: String,
}

impl DefaultEntry {
    /// Creates an entry for `(base, name)`.
    pub fn new(
        base: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            base: base.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

impl ConfigSource for DefaultEntry {
    fn load_into(&self, store: &mut ConfigStore) -> Result<LoadReport, ConfigError> {
        store.try_set(&self.base, &self.name, &self.value)?;
        Ok(LoadReport {
            applied: 1,
            malformed: Vec::new(),
        })
    }
}

/// One line as read from the source, line terminator included.
#[derive(Debug)]
pub(crate) struct RawLine {
    pub number: usize,
    pub bytes: Vec<u8>,
}

/// Lazy, single-pass iterator over the raw lines of a reader.
///
/// A read error is yielded once, tagged with the number of the line being
/// read, and ends the iteration.
pub(crate) struct RawLines<R> {
    reader: R,
    line: usize,
    done: bool,
}

impl<R: BufRead> RawLines<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = Result<RawLine, (usize, io::Error)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut bytes = Vec::new();
        match self.reader.read_until(b'\n', &mut bytes) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line += 1;
                Some(Ok(RawLine {
                    number: self.line,
                    bytes,
                }))
            }
            Err(e) => {
                self.done = true;
                Some(Err((self.line + 1, e)))
            }
        }
    }
}
