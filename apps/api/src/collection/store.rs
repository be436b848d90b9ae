//! Append-only entry store: one UTF-8 text file per collection, one entry per line.
//!
//! Appends and reads share a read/write lock, so `read_all` always returns a
//! point-in-time snapshot and never a half-written line. Each append is a single
//! `write_all` of one complete line to a file opened in append mode.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::collection::name::CollectionName;

/// Separator used when a submission spans several lines.
const LINE_JOINER: &str = "\u{3000}";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("refusing to store an empty entry")]
    EmptyEntry,
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug)]
pub struct EntryStore {
    data_dir: PathBuf,
    lock: RwLock<()>,
}

impl EntryStore {
    /// Opens the store rooted at `data_dir`, creating the directory if needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|e| StoreError::io(&data_dir, e))?;
        Ok(EntryStore {
            data_dir,
            lock: RwLock::new(()),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Appends one entry and returns the line as stored.
    pub fn append(&self, collection: &CollectionName, entry: &str) -> Result<String, StoreError> {
        let line = normalize_entry(entry);
        if line.is_empty() {
            return Err(StoreError::EmptyEntry);
        }

        let path = self.path_for(collection);
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        file.write_all(format!("{line}\n").as_bytes())
            .map_err(|e| StoreError::io(&path, e))?;

        debug!(collection = %collection, chars = line.chars().count(), "Entry appended");
        Ok(line)
    }

    /// All entries of `collection` in submission order. Blank lines are skipped and
    /// a collection that was never written to is empty.
    pub fn read_all(&self, collection: &CollectionName) -> Result<Vec<String>, StoreError> {
        let path = self.path_for(collection);
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        Ok(raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Names of all collections that have an entry file, sorted.
    pub fn list_collections(&self) -> Result<Vec<CollectionName>, StoreError> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        let dir = fs::read_dir(&self.data_dir).map_err(|e| StoreError::io(&self.data_dir, e))?;

        let mut names = Vec::new();
        for item in dir {
            let path = item.map_err(|e| StoreError::io(&self.data_dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
                continue;
            }
            // Files not created through a valid name are ignored.
            if let Some(name) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| CollectionName::parse(stem).ok())
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn path_for(&self, collection: &CollectionName) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }
}

/// Trims the entry and folds embedded line breaks so one submission stays one line.
fn normalize_entry(entry: &str) -> String {
    entry
        .split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(LINE_JOINER)
}

/// CR, LF and the other Unicode line and paragraph terminators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
