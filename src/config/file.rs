//! File-based configuration source.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::loader::LoadReport;
use super::source::ConfigSource;
use super::{ConfigError, ConfigStore};

/// A configuration source that loads from a `name=value` file.
///
/// Files can be marked as required or optional. Required files that don't exist
/// cause an error; optional files that don't exist are silently skipped.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    required: bool,
}

impl FileSource {
    /// Creates a new file source.
    ///
    /// If `required` is true, the build will fail if the file doesn't exist.
    pub fn new(path: impl AsRef<Path>, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }
}

impl ConfigSource for FileSource {
    fn load_into(&self, store: &mut ConfigStore) -> Result<LoadReport, ConfigError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if self.required {
                    return Err(ConfigError::FileNotFound(self.path.clone()));
                }
                debug!(
                    path = %self.path.display(),
                    "optional config file missing, skipping"
                );
                return Ok(LoadReport::default());
            }
            Err(e) => {
                return Err(ConfigError::Open {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        store.load_lines(BufReader::new(file), &self.path.display().to_string())
    }
}
