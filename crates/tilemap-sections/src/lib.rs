//! Structured section source and validation collector.
//!
//! A configuration file is a root section of plain keys followed by named
//! sections whose headers have the form `type:name`. Tokenizing is delegated
//! to the `toml` crate; every scalar reaches the caller as a string so that
//! typed extraction and its error reporting stay with the consumer.
//!
//! Validation findings are collected, never thrown: parsers push
//! [`ValidationMessage`]s into a [`ValidationList`] scoped to one section,
//! and a [`ValidationMap`] keeps one list per section identity in the order
//! the sections were visited.

mod error;
mod section;
mod source;
mod validation;

pub use error::SourceError;
pub use section::ConfigSection;
pub use source::{ConfigSource, ValueKind};
pub use validation::{Severity, ValidationEntry, ValidationList, ValidationMap, ValidationMessage};
