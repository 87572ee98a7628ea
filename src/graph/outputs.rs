// src/graph/outputs.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::model::{NodeId, SlotIndex};

/// Per-slot output values of an executed node.
pub type SlotValues = Vec<serde_json::Value>;

/// Outputs already computed in the current run.
///
/// Presence of a node id means "already satisfied, do not recurse further".
/// The invalidation pass removes entries as a documented side effect of a
/// `true` verdict; this table is the single source of truth for what may be
/// reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputsTable {
    entries: HashMap<NodeId, SlotValues>,
}

impl OutputsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<NodeId>, values: SlotValues) {
        self.entries.insert(id.into(), values);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&SlotValues> {
        self.entries.get(id)
    }

    /// A single slot value, if the node has been computed and the slot exists.
    pub fn slot(&self, id: &str, slot: SlotIndex) -> Option<&serde_json::Value> {
        self.entries.get(id).and_then(|values| values.get(slot))
    }

    /// Remove a node's cached output (eviction). Returns the evicted values.
    pub fn remove(&mut self, id: &str) -> Option<SlotValues> {
        self.entries.remove(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
