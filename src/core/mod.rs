//! core
//!
//! Core data model, codec, storage and configuration for dotdb.
//!
//! # Modules
//!
//! - [`value`] - Values, keys and tables
//! - [`path`] - Dotted path parsing and validation
//! - [`literal`] - Table literal serializer and literal-only parser
//! - [`store`] - The dotted-path store and its persistence
//! - [`lock`] - Exclusive lock held while saving a store
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Tables are ordered, so serialization is deterministic
//! - Stored files are data only and are never executed
//! - Invalid paths are rejected before anything is modified

pub mod config;
pub mod literal;
pub mod lock;
pub mod path;
pub mod store;
pub mod value;
