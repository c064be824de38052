//! dotdb - A dotted-path table store with a power help scraper
//!
//! dotdb keeps nested tables of strings, numbers and booleans in a single
//! file, addressed by dotted paths like `char.stats.hp`. The file holds a
//! plain table literal that is read back by a data-only parser. On top of
//! the store sits a scraper that turns captured power help text into
//! records and fetches many of them at a steady, one-per-tick pace.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, calls the library)
//! - [`core`] - Values, paths, the literal codec, the store and config
//! - [`scrape`] - Help-text parsing, the power catalog and the fetch chain
//! - [`ui`] - Console output utilities
//!
//! # Example
//!
//! ```
//! use dotdb::core::store::PathStore;
//! use dotdb::core::value::Value;
//!
//! let mut store = PathStore::new();
//! store.set("char.stats.hp", 120i64).unwrap();
//!
//! assert_eq!(store.get("char.stats.hp"), Some(&Value::Int(120)));
//! assert!(store.get("char.name").is_none());
//! ```

pub mod cli;
pub mod core;
pub mod scrape;
pub mod ui;
