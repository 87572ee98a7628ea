// src/reval/memo.rs

use std::collections::HashMap;

use tracing::debug;

use crate::graph::{EdgeRef, NodeId, SlotIndex};
use crate::reval::count::ExecutionCount;

/// Composite memo key: (producer node id, output slot index).
///
/// Invalidation verdicts are cached per slot-qualified edge to match the
/// host's key scheme; a producer has a bounded number of output slots, so
/// this never changes the asymptotic behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub producer: NodeId,
    pub slot: SlotIndex,
}

impl MemoKey {
    pub fn new(producer: impl Into<NodeId>, slot: SlotIndex) -> Self {
        Self {
            producer: producer.into(),
            slot,
        }
    }
}

impl From<&EdgeRef> for MemoKey {
    fn from(edge: &EdgeRef) -> Self {
        Self {
            producer: edge.producer.clone(),
            slot: edge.slot,
        }
    }
}

/// Per-run memo tables shared by the two re-evaluation algorithms.
///
/// Both tables start empty at run start and are cleared at the next run
/// start. Entries are run-relative (fingerprints and outputs move between
/// runs) and must never leak across runs.
#[derive(Debug, Default)]
pub struct RunMemoStore {
    will_execute: HashMap<NodeId, ExecutionCount>,
    invalidation: HashMap<MemoKey, bool>,
}

impl RunMemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear both tables. Called exactly once at the start of each run.
    pub fn reset(&mut self) {
        let dropped = self.will_execute.len() + self.invalidation.len();
        self.will_execute.clear();
        self.invalidation.clear();
        debug!(dropped, "run memo store reset");
    }

    pub fn is_empty(&self) -> bool {
        self.will_execute.is_empty() && self.invalidation.is_empty()
    }

    pub(crate) fn will_execute(&self, node: &str) -> Option<&ExecutionCount> {
        self.will_execute.get(node)
    }

    pub(crate) fn record_will_execute(&mut self, result: ExecutionCount) {
        self.will_execute
            .insert(result.node_id().to_string(), result);
    }

    pub(crate) fn invalidation(&self, key: &MemoKey) -> Option<bool> {
        self.invalidation.get(key).copied()
    }

    pub(crate) fn record_invalidation(&mut self, key: MemoKey, verdict: bool) {
        self.invalidation.insert(key, verdict);
    }
}
