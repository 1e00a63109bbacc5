//! Sync planning
//!
//! Orders streams so that every parent is synced before its children. The
//! order is stable with respect to declaration order: among the streams
//! whose parent is already placed, the one declared first goes next.

use crate::error::{Error, Result};
use crate::schema::DeclaredSchemas;
use crate::stream::{validate_definitions, StreamDefinition};
use std::collections::HashSet;

/// One stream of a plan
#[derive(Debug, Clone)]
pub struct PlanEntry {
    /// The stream
    pub definition: StreamDefinition,
    /// Whether records are emitted; `false` for ancestors synced only to
    /// feed their children
    pub emit: bool,
}

/// Ordered list of streams for one run
#[derive(Debug, Clone)]
pub struct SyncPlan {
    entries: Vec<PlanEntry>,
}

impl SyncPlan {
    /// Build the plan.
    ///
    /// With `selection = None` every definition is selected. Unselected
    /// ancestors of selected streams are added as non-emitting entries.
    pub fn build(definitions: Vec<StreamDefinition>, selection: Option<&[String]>) -> Result<Self> {
        validate_definitions(&definitions)?;

        let selected: HashSet<&str> = match selection {
            Some(names) => {
                for name in names {
                    if !definitions.iter().any(|d| &d.name == name) {
                        return Err(Error::StreamNotFound {
                            stream: name.clone(),
                        });
                    }
                }
                names.iter().map(String::as_str).collect()
            }
            None => definitions.iter().map(|d| d.name.as_str()).collect(),
        };

        let needed = with_ancestors(&definitions, &selected)?;

        let mut placed: Vec<usize> = Vec::with_capacity(needed.len());
        let mut placed_names: HashSet<&str> = HashSet::new();
        while placed.len() < needed.len() {
            let next = definitions.iter().enumerate().position(|(index, d)| {
                needed.contains(d.name.as_str())
                    && !placed.contains(&index)
                    && d.parent
                        .as_deref()
                        .map_or(true, |parent| placed_names.contains(parent))
            });

            let Some(index) = next else {
                let stuck: Vec<&str> = definitions
                    .iter()
                    .enumerate()
                    .filter(|(i, d)| needed.contains(d.name.as_str()) && !placed.contains(i))
                    .map(|(_, d)| d.name.as_str())
                    .collect();
                return Err(Error::config(format!(
                    "Cycle in stream parents: {}",
                    stuck.join(", ")
                )));
            };

            placed.push(index);
            placed_names.insert(definitions[index].name.as_str());
        }

        let entries = placed
            .into_iter()
            .map(|index| {
                let definition = definitions[index].clone();
                let emit = selected.contains(definition.name.as_str());
                PlanEntry { definition, emit }
            })
            .collect();

        Ok(Self { entries })
    }

    /// Entries in execution order
    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    /// Stream names in execution order
    pub fn names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.definition.name.as_str())
            .collect()
    }

    /// Look up an entry
    pub fn get(&self, stream: &str) -> Option<&PlanEntry> {
        self.entries.iter().find(|e| e.definition.name == stream)
    }

    /// Planned children of a stream, in plan order
    pub fn children_of(&self, stream: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.definition.parent.as_deref() == Some(stream))
            .map(|e| e.definition.name.as_str())
            .collect()
    }

    /// Validator over the schemas of the planned streams
    pub fn schemas(&self) -> DeclaredSchemas {
        self.entries
            .iter()
            .map(|e| e.definition.schema.clone())
            .collect()
    }

    /// Number of planned streams
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is planned
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selected names plus every ancestor, failing on a parent cycle
fn with_ancestors<'a>(
    definitions: &'a [StreamDefinition],
    selected: &HashSet<&str>,
) -> Result<HashSet<&'a str>> {
    let mut needed = HashSet::new();
    for definition in definitions {
        if !selected.contains(definition.name.as_str()) {
            continue;
        }

        let mut current = Some(definition);
        let mut chain = HashSet::new();
        while let Some(d) = current {
            if !chain.insert(d.name.as_str()) {
                return Err(Error::config(format!(
                    "Cycle in stream parents at '{}'",
                    d.name
                )));
            }
            needed.insert(d.name.as_str());
            current = d
                .parent
                .as_deref()
                .and_then(|p| definitions.iter().find(|x| x.name == p));
        }
    }
    Ok(needed)
}
