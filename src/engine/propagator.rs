//! Parent → child context propagation
//!
//! While a parent stream is synced, every record it produces yields one
//! context, queued for each of the parent's planned children. Queues keep
//! the order in which parent records were produced; nothing is reordered,
//! deduplicated or batched.

use super::plan::SyncPlan;
use crate::context::Context;
use std::collections::{HashMap, VecDeque};

/// Per-stream queues of pending contexts
#[derive(Debug, Default)]
pub struct ContextPropagator {
    queues: HashMap<String, VecDeque<Context>>,
    skipped: HashMap<String, usize>,
    children: HashMap<String, Vec<String>>,
}

impl ContextPropagator {
    /// Queue the empty context for every root stream of the plan
    pub fn new(plan: &SyncPlan) -> Self {
        let mut propagator = Self::default();
        for entry in plan.entries() {
            let name = &entry.definition.name;
            let queue = propagator.queues.entry(name.clone()).or_default();
            if entry.definition.is_root() {
                queue.push_back(Context::new());
            }

            let children = plan
                .children_of(name)
                .into_iter()
                .map(str::to_string)
                .collect();
            propagator.children.insert(name.clone(), children);
        }
        propagator
    }

    /// Whether the parent has any planned child
    pub fn has_children(&self, parent: &str) -> bool {
        self.children.get(parent).is_some_and(|c| !c.is_empty())
    }

    /// Queue a context produced by a parent record for each child
    pub fn push(&mut self, parent: &str, ctx: &Context) {
        for child in self.children.get(parent).into_iter().flatten() {
            self.queues
                .entry(child.clone())
                .or_default()
                .push_back(ctx.clone());
        }
    }

    /// Count a parent record that produced no child context
    pub fn skip(&mut self, parent: &str) {
        for child in self.children.get(parent).into_iter().flatten() {
            *self.skipped.entry(child.clone()).or_default() += 1;
        }
    }

    /// Next pending context of a stream
    pub fn pop(&mut self, stream: &str) -> Option<Context> {
        self.queues.get_mut(stream)?.pop_front()
    }

    /// Number of pending contexts of a stream
    pub fn pending(&self, stream: &str) -> usize {
        self.queues.get(stream).map_or(0, VecDeque::len)
    }

    /// Take the count of contexts skipped for a stream
    pub fn take_skipped(&mut self, stream: &str) -> usize {
        self.skipped.remove(stream).unwrap_or(0)
    }
}
