//! scrape::catalog
//!
//! Power records kept in a [`PathStore`].
//!
//! # Layout
//!
//! Records live under a root path (default `powers`), one table per power
//! keyed by its name:
//!
//! ```text
//! powers = {
//!   ["Fire Ball"] = { alias = "fb", recharge = 150, ready = true },
//! }
//! ```
//!
//! Power names are used as single keys even when they contain dots.

use tracing::debug;

use super::power::PowerRecord;
use super::text::same_name;
use crate::core::path::{DottedPath, PathError};
use crate::core::store::PathStore;
use crate::core::value::{Key, Table, Value};

const ALIAS: &str = "alias";
const RECHARGE: &str = "recharge";
const READY: &str = "ready";

/// View of the power records stored under one root path.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: DottedPath,
}

impl Catalog {
    /// Create a catalog rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns `PathError` if `root` is not a valid dotted path.
    pub fn new(root: &str) -> Result<Self, PathError> {
        Ok(Self {
            root: DottedPath::parse(root)?,
        })
    }

    pub fn root(&self) -> &DottedPath {
        &self.root
    }

    /// Write one record, replacing any previous entry for the same name.
    pub fn store_record(&self, store: &mut PathStore, record: &PowerRecord) -> Result<(), PathError> {
        let path = self.root.join(&record.name)?;

        let mut entry = Table::new();
        if let Some(alias) = &record.alias {
            entry.insert(Key::from(ALIAS), Value::from(alias.as_str()));
        }
        entry.insert(
            Key::from(RECHARGE),
            Value::Int(i64::try_from(record.recharge_seconds).unwrap_or(i64::MAX)),
        );
        entry.insert(Key::from(READY), Value::Bool(record.is_ready));

        store.set_path(&path, Value::Table(entry));
        Ok(())
    }

    /// Write several records.
    pub fn store_all<'a, I>(&self, store: &mut PathStore, records: I) -> Result<usize, PathError>
    where
        I: IntoIterator<Item = &'a PowerRecord>,
    {
        let mut count = 0;
        for record in records {
            self.store_record(store, record)?;
            count += 1;
        }
        Ok(count)
    }

    /// All well-formed records, ordered by name.
    pub fn load_records(&self, store: &PathStore) -> Vec<PowerRecord> {
        let Some(table) = store.get_path(&self.root).and_then(Value::as_table) else {
            return Vec::new();
        };

        table
            .iter()
            .filter_map(|(key, value)| {
                let record = key
                    .as_name()
                    .zip(value.as_table())
                    .map(|(name, entry)| record_from(name, entry));
                if record.is_none() {
                    debug!(key = %key, kind = value.kind(), "skipping malformed catalog entry");
                }
                record
            })
            .collect()
    }

    /// Find a record by name or alias, ignoring case.
    pub fn find(&self, store: &PathStore, query: &str) -> Option<PowerRecord> {
        self.load_records(store).into_iter().find(|record| {
            same_name(&record.name, query)
                || record.alias.as_deref().is_some_and(|a| same_name(a, query))
        })
    }
}

fn record_from(name: &str, entry: &Table) -> PowerRecord {
    let field = |key: &str| entry.get(&Key::from(key));

    PowerRecord {
        name: name.to_string(),
        alias: field(ALIAS).and_then(Value::as_str).map(str::to_string),
        recharge_seconds: field(RECHARGE)
            .and_then(Value::as_int)
            .and_then(|secs| u64::try_from(secs).ok())
            .unwrap_or(0),
        is_ready: field(READY).and_then(Value::as_bool).unwrap_or(true),
    }
}
