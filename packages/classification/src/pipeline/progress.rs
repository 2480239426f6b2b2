//! Progress store - append-only record of per-item classification outcomes.
//!
//! One JSON object per line, keyed by item index. Records are appended once
//! per item and flushed immediately, so an interrupted run loses at most the
//! in-flight batch. There is no update or delete: corrections require editing
//! the file by hand.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::traits::item::Category;
use crate::types::classification::Classification;

/// Handle to the progress file for one pipeline.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    /// Open a store at the given path. The file need not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all persisted records into a map keyed by item index.
    ///
    /// An absent file is an empty store. Blank lines are skipped. Writers
    /// append at most once per index, but if that is ever violated the last
    /// record for an index wins.
    pub fn load<C: Category>(&self) -> Result<HashMap<usize, Classification<C>>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(HashMap::new());
            }
            Err(err) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        let mut done = HashMap::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|err| StoreError::Io {
                path: self.path.clone(),
                source: err,
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Classification<C> =
                serde_json::from_str(&line).map_err(|err| StoreError::Malformed {
                    path: self.path.clone(),
                    line: lineno + 1,
                    source: err,
                })?;
            done.insert(record.idx, record);
        }
        Ok(done)
    }

    /// Open the store for appending, creating the file if needed.
    pub fn appender(&self) -> Result<ProgressWriter, StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|err| StoreError::Io {
                    path: self.path.clone(),
                    source: err,
                })?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| StoreError::Io {
                path: self.path.clone(),
                source: err,
            })?;
        Ok(ProgressWriter {
            path: self.path.clone(),
            file,
        })
    }
}

/// Append handle returned by [`ProgressStore::appender`].
#[derive(Debug)]
pub struct ProgressWriter {
    path: PathBuf,
    file: File,
}

impl ProgressWriter {
    /// Append one record and flush it to disk.
    pub fn append<C: Category>(&mut self, record: &Classification<C>) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        self.file
            .write_all(line.as_bytes())
            .and_then(|_| self.file.flush())
            .map_err(|err| StoreError::Io {
                path: self.path.clone(),
                source: err,
            })
    }
}
