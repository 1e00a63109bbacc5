//! State management module
//!
//! Tracks per-stream bookmarks so a later run can resume. State is the
//! Singer `bookmarks` document and is emitted as `STATE` messages as well as
//! persisted between runs.
//!
//! # Overview
//!
//! The state module provides:
//! - `State` - Bookmarks per stream, with one partition per child context
//! - `StateManager` - File-based state persistence with atomic writes

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{is_newer, PartitionState, State, StreamState};

#[cfg(test)]
mod manager_tests;
