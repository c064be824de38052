//! core::store
//!
//! Dotted-path access to a nested table, with file persistence.
//!
//! # Architecture
//!
//! A [`PathStore`] owns one root [`Table`]. Callers address values with
//! dotted paths (`"player.powers.fireball"`); intermediate tables are
//! created on demand by [`PathStore::set`]. The whole root is persisted by
//! [`PathStore::save`] in the literal format of [`crate::core::literal`] and
//! read back by [`PathStore::open`] without executing anything.
//!
//! # Overwrite Semantics
//!
//! If a non-terminal segment of a `set` path currently holds a non-table
//! value, that value is replaced by a new empty table. This is logged at
//! debug level and is not an error:
//!
//! ```
//! use dotdb::core::store::PathStore;
//! use dotdb::core::value::Value;
//!
//! let mut store = PathStore::new();
//! store.set("a.b", 1i64).unwrap();
//! store.set("a.b.c", 2i64).unwrap();
//!
//! assert_eq!(store.get("a.b.c"), Some(&Value::Int(2)));
//! assert!(store.get("a.b").unwrap().is_table());
//! ```
//!
//! # Persistence
//!
//! - Saves are atomic (temp file `<file>.tmp`, fsync, rename) under a
//!   [`StoreLock`]
//! - Serialization happens before any file is touched, so a value that
//!   cannot be serialized leaves the existing file intact
//! - `open` never fails: a missing file yields an empty store, a broken
//!   one yields an empty store plus a [`StoreWarning`]
//! - [`PathStore::preserve_unreadable`] copies a broken file to
//!   `<file>.bak` so the next save does not lose it

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::literal::{dump_file, parse_file, DumpError, ParseError};
use super::lock::{LockError, StoreLock};
use super::path::{DottedPath, PathError};
use super::value::{Key, Table, Value};

/// Errors from store persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read store file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse store file '{path}': {source}")]
    Parse { path: PathBuf, source: ParseError },

    #[error("could not serialize store: {0}")]
    Dump(#[from] DumpError),

    #[error("failed to write store file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// A non-fatal problem found while opening a store.
#[derive(Debug, Clone)]
pub struct StoreWarning {
    pub message: String,
    pub path: PathBuf,
}

impl std::fmt::Display for StoreWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of [`PathStore::open`].
#[derive(Debug)]
pub struct StoreLoadResult {
    pub store: PathStore,
    pub warnings: Vec<StoreWarning>,
}

/// Outcome of an [`PathStore::import`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// `(old_key, new_path)` pairs that were copied.
    pub copied: Vec<(String, String)>,
    /// Old keys absent from the source.
    pub skipped: Vec<String>,
}

/// A nested table addressed by dotted paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathStore {
    root: Table,
}

impl PathStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing root table.
    pub fn from_root(root: Table) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    pub fn into_root(self) -> Table {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Open a store file, starting empty if it is missing or unreadable.
    pub fn open(path: &Path) -> StoreLoadResult {
        let mut warnings = Vec::new();

        if !path.exists() {
            debug!(path = %path.display(), "store file not found, starting empty");
            return StoreLoadResult {
                store: Self::new(),
                warnings,
            };
        }

        let store = match Self::load(path) {
            Ok(root) => {
                debug!(path = %path.display(), entries = root.len(), "store loaded");
                Self::from_root(root)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "store file unusable");
                warnings.push(StoreWarning {
                    message: format!("{}; starting with an empty store", e),
                    path: path.to_path_buf(),
                });
                Self::new()
            }
        };

        StoreLoadResult { store, warnings }
    }

    /// Read and parse a store file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the file cannot be read and
    /// `StoreError::Parse` if its contents are not a valid table literal.
    pub fn load(path: &Path) -> Result<Table, StoreError> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        parse_file(&contents).map_err(|e| StoreError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Look up a value. Missing segments, non-table intermediates and
    /// invalid paths are all reported as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let path = DottedPath::parse(path).ok()?;
        self.get_path(&path)
    }

    pub fn get_path(&self, path: &DottedPath) -> Option<&Value> {
        let mut table = &self.root;
        for segment in path.parents() {
            table = table.get(&Key::Name(segment.clone()))?.as_table()?;
        }
        table.get(&Key::Name(path.last().to_string()))
    }

    /// True if a value exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Assign `value` at `path`, creating intermediate tables.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if `path` is empty, has an empty segment or is
    /// longer than [`MAX_SEGMENTS`](super::path::MAX_SEGMENTS).
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), PathError> {
        let path = DottedPath::parse(path)?;
        self.set_path(&path, value.into());
        Ok(())
    }

    pub fn set_path(&mut self, path: &DottedPath, value: Value) {
        set_in(&mut self.root, path.segments(), value, path);
    }

    /// Remove and return the value at `path`.
    pub fn delete(&mut self, path: &str) -> Option<Value> {
        let path = DottedPath::parse(path).ok()?;
        remove_in(&mut self.root, path.segments())
    }

    /// Child keys of the table at `path`; an empty `path` means the root.
    ///
    /// Returns `None` if nothing is stored there or the value is not a table.
    pub fn keys(&self, path: &str) -> Option<Vec<Key>> {
        let table = if path.is_empty() {
            &self.root
        } else {
            self.get(path)?.as_table()?
        };
        Some(table.keys().cloned().collect())
    }

    /// Copy selected top-level entries of another store file into this one.
    ///
    /// Each `(old_key, new_path)` pair copies the source's top-level
    /// `old_key` value to `new_path`. Keys missing from the source are
    /// skipped and listed in the report; that is not an error.
    ///
    /// # Errors
    ///
    /// Fails without modifying the store if the source cannot be loaded or
    /// any `new_path` is invalid.
    pub fn import(
        &mut self,
        source: &Path,
        mapping: &[(String, String)],
    ) -> Result<ImportReport, StoreError> {
        let targets = mapping
            .iter()
            .map(|(_, new_path)| DottedPath::parse(new_path))
            .collect::<Result<Vec<_>, _>>()?;

        let source_root = Self::load(source)?;
        let mut report = ImportReport::default();

        for ((old_key, new_path), target) in mapping.iter().zip(&targets) {
            match source_root.get(&Key::Name(old_key.clone())) {
                Some(value) => {
                    self.set_path(target, value.clone());
                    report.copied.push((old_key.clone(), new_path.clone()));
                }
                None => {
                    debug!(key = %old_key, source = %source.display(), "import key not in source");
                    report.skipped.push(old_key.clone());
                }
            }
        }

        Ok(report)
    }

    /// Copy `path` to `<path>.bak` if it exists but cannot be loaded.
    ///
    /// Returns the backup location when a copy was made. Missing and
    /// loadable files are left alone.
    pub fn preserve_unreadable(path: &Path) -> Result<Option<PathBuf>, StoreError> {
        if !path.exists() || Self::load(path).is_ok() {
            return Ok(None);
        }

        let backup = backup_path_for(path);
        fs::copy(path, &backup).map_err(write_error(&backup))?;
        debug!(path = %path.display(), backup = %backup.display(), "kept unreadable store");
        Ok(Some(backup))
    }

    /// Serialize the whole store in the persisted file format.
    pub fn to_literal(&self) -> Result<String, DumpError> {
        dump_file(&self.root)
    }

    /// Write the store to `path` atomically.
    ///
    /// Creates parent directories if needed and holds the store lock for
    /// the duration of the write.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let contents = self.to_literal()?;
        let _lock = StoreLock::acquire(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error(path))?;
        }

        let temp_path = temp_path_for(path);
        {
            let mut file = fs::File::create(&temp_path).map_err(write_error(&temp_path))?;
            file.write_all(contents.as_bytes())
                .map_err(write_error(&temp_path))?;
            file.sync_all().map_err(write_error(&temp_path))?;
        }

        fs::rename(&temp_path, path).map_err(write_error(path))?;
        debug!(path = %path.display(), bytes = contents.len(), "store saved");
        Ok(())
    }
}

/// Scratch file a save writes before renaming: `<file>.tmp`.
pub fn temp_path_for(store_path: &Path) -> PathBuf {
    sibling_path(store_path, ".tmp")
}

/// Copy kept of an unreadable store file: `<file>.bak`.
pub fn backup_path_for(store_path: &Path) -> PathBuf {
    sibling_path(store_path, ".bak")
}

fn sibling_path(store_path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = store_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("store"));
    name.push(suffix);
    store_path.with_file_name(name)
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Write { path, source }
}

fn set_in(table: &mut Table, segments: &[String], value: Value, full: &DottedPath) {
    match segments {
        [] => {}
        [last] => {
            table.insert(Key::Name(last.clone()), value);
        }
        [first, rest @ ..] => {
            let slot = table
                .entry(Key::Name(first.clone()))
                .or_insert_with(Value::table);
            if !slot.is_table() {
                debug!(
                    path = %full,
                    segment = %first,
                    replaced = slot.kind(),
                    "overwriting non-table value with a table"
                );
                *slot = Value::table();
            }
            if let Value::Table(child) = slot {
                set_in(child, rest, value, full);
            }
        }
    }
}

fn remove_in(table: &mut Table, segments: &[String]) -> Option<Value> {
    match segments {
        [] => None,
        [last] => table.remove(&Key::Name(last.clone())),
        [first, rest @ ..] => {
            let child = table.get_mut(&Key::Name(first.clone()))?.as_table_mut()?;
            remove_in(child, rest)
        }
    }
}
