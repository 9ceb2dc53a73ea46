//! Streaming config files into a [`ConfigStore`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use super::error::{MalformedKind, MalformedLine};
use super::parse::{parse_line, Line};
use super::source::RawLines;
use super::{ConfigError, ConfigStore};

/// Outcome of a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Assignments written to the store, overwrites included.
    pub applied: usize,
    /// Lines that were skipped.
    pub malformed: Vec<MalformedLine>,
}

impl LoadReport {
    /// `true` when no line was skipped.
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

impl ConfigStore {
    /// Loads every assignment from `reader`.
    ///
    /// Malformed lines are skipped and listed in the report. Only a failing
    /// read is an error; assignments read before it stay in the store.
    pub fn load_from_handle<R: BufRead>(
        &mut self,
        reader: R,
    ) -> Result<LoadReport, ConfigError> {
        self.load_lines(reader, "<handle>")
    }

    /// Opens `path` and loads it with [`load_from_handle`](Self::load_from_handle).
    pub fn load_from_path(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<LoadReport, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_lines(BufReader::new(file), &path.display().to_string())
    }

    pub(crate) fn load_lines<R: BufRead>(
        &mut self,
        reader: R,
        origin: &str,
    ) -> Result<LoadReport, ConfigError> {
        let mut report = LoadReport::default();

        for raw in RawLines::new(reader) {
            let raw = raw.map_err(|(line, source)| ConfigError::Read {
                origin: origin.to_owned(),
                line,
                source,
            })?;

            let text = match std::str::from_utf8(&raw.bytes) {
                Ok(text) => text,
                Err(_) => {
                    let lossy = String::from_utf8_lossy(&raw.bytes);
                    report.skip(origin, raw.number, MalformedKind::InvalidUtf8, &lossy);
                    continue;
                }
            };

            match parse_line(text) {
                Line::Blank | Line::Comment => {}
                Line::Assignment { base, name, value } => {
                    self.set(base, name, value);
                    report.applied += 1;
                }
                Line::Malformed(kind) => report.skip(origin, raw.number, kind, text),
            }
        }

        debug!(
            origin,
            applied = report.applied,
            skipped = report.malformed.len(),
            "config source loaded"
        );
        Ok(report)
    }
}

impl LoadReport {
    fn skip(&mut self, origin: &str, line: usize, kind: MalformedKind, text: &str) {
        let malformed = MalformedLine {
            line,
            kind,
            text: text.trim().to_owned(),
        };
        warn!(origin, "skipping malformed config line: {malformed}");
        self.malformed.push(malformed);
    }
}
