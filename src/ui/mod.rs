//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All console output goes through this module so quiet and debug modes
//! behave the same in every command. Library diagnostics use `tracing`
//! instead.

pub mod output;
