//! Declared stream schemas
//!
//! Every stream carries an inline field table (see [`catalog`]). At startup
//! the tables are turned into [`StreamSchema`] values which are used to:
//!
//! - **Describe**: render the Singer JSON schema for `discover` and `SCHEMA`
//! - **Conform**: remove undeclared top-level properties from records
//! - **Validate**: check declared types and required fields
//!   ([`DeclaredSchemas`] behind the [`RecordValidator`] trait)

pub mod catalog;
mod types;
mod validate;

pub use types::{Field, FieldType, StreamSchema};
pub use validate::{DeclaredSchemas, RecordValidator};

#[cfg(test)]
mod tests;
