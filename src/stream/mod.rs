//! Stream definitions
//!
//! A [`StreamDefinition`] is the immutable descriptor of one Bitly resource
//! type: where it is listed, how its pages are decoded and paginated, how
//! its query is built, and which identifiers its records hand down to child
//! streams.

mod definition;
mod validate;

pub use definition::{ChildContextMapping, StreamDefinition};
pub use validate::validate_definitions;

#[cfg(test)]
mod tests;
