//! Definition-set checks run before any request is made

use super::definition::StreamDefinition;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Check names, parents and placeholder bindings of a set of definitions.
///
/// A child stream must have at least one path placeholder and its parent's
/// context mapping must provide every one of them; a root stream must have
/// none.
pub fn validate_definitions(streams: &[StreamDefinition]) -> Result<()> {
    let mut names = HashSet::new();
    for stream in streams {
        if !names.insert(stream.name.as_str()) {
            return Err(Error::config(format!(
                "Duplicate stream name '{}'",
                stream.name
            )));
        }
    }

    for stream in streams {
        let placeholders = stream.placeholders();

        let Some(parent_name) = &stream.parent else {
            if let Some(placeholder) = placeholders.first() {
                return Err(Error::missing_placeholder(placeholder, &stream.path));
            }
            continue;
        };

        let parent = streams
            .iter()
            .find(|s| &s.name == parent_name)
            .ok_or_else(|| {
                Error::config(format!(
                    "Stream '{}' has unknown parent '{parent_name}'",
                    stream.name
                ))
            })?;

        if placeholders.is_empty() {
            return Err(Error::config(format!(
                "Child stream '{}' has no path placeholder",
                stream.name
            )));
        }

        let provided: HashSet<&str> = parent
            .child_context
            .as_ref()
            .map(|m| m.placeholders().collect())
            .unwrap_or_default();
        if let Some(missing) = placeholders.iter().find(|p| !provided.contains(p.as_str())) {
            return Err(Error::missing_placeholder(missing, &stream.path));
        }
    }

    Ok(())
}

