// src/reval/strategy.rs

//! The strategy seam.
//!
//! Drivers depend on [`ReevalStrategy`] and select an implementation at
//! construction time, so the memoized and baseline implementations are
//! interchangeable without callers knowing which one is active.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::graph::{Fingerprint, NodeId, OutputsTable, PromptGraph, RunSnapshot};
use crate::registry::NodeCatalog;
use crate::reval::baseline::BaselineReeval;
use crate::reval::count::ExecutionCount;
use crate::reval::estimate;
use crate::reval::invalidate::InvalidationPass;
use crate::reval::memo::RunMemoStore;
use crate::types::Strategy;

/// Capability interface for prompt-graph re-evaluation.
///
/// One instance serves one top-level run at a time; overlapping runs need
/// their own instances.
pub trait ReevalStrategy {
    /// Clear all per-run state. Call exactly once at the start of each
    /// top-level run, before either query.
    fn reset_run_memo(&mut self);

    /// Number of not-yet-satisfied nodes that must execute to produce
    /// `target`. Errors only for an unknown target id.
    fn estimate(
        &mut self,
        graph: &PromptGraph,
        outputs: &OutputsTable,
        target: &str,
    ) -> Result<ExecutionCount>;

    /// Whether `target`'s cached output is stale relative to the previous
    /// run.
    ///
    /// A `true` verdict removes the node's entry from `outputs` as part of
    /// this call; eviction is coupled to the decision so each node is
    /// traversed at most once per run.
    fn should_invalidate(
        &mut self,
        graph: &PromptGraph,
        previous: &RunSnapshot,
        outputs: &mut OutputsTable,
        target: &str,
    ) -> Result<bool>;

    /// Fingerprints computed so far this run, keyed by node id. Fold these
    /// into the next run's snapshot.
    fn recorded_fingerprints(&self) -> &HashMap<NodeId, Fingerprint>;
}

/// The memoized implementation: per-run memo tables keep both traversals
/// proportional to the number of distinct (producer, slot) pairs instead of
/// growing with fan-in and fan-out.
pub struct MemoizedReeval {
    catalog: Arc<dyn NodeCatalog>,
    memo: RunMemoStore,
    ledger: HashMap<NodeId, Fingerprint>,
}

impl MemoizedReeval {
    pub fn new(catalog: Arc<dyn NodeCatalog>) -> Self {
        Self {
            catalog,
            memo: RunMemoStore::new(),
            ledger: HashMap::new(),
        }
    }
}

impl ReevalStrategy for MemoizedReeval {
    fn reset_run_memo(&mut self) {
        self.memo.reset();
        self.ledger.clear();
    }

    fn estimate(
        &mut self,
        graph: &PromptGraph,
        outputs: &OutputsTable,
        target: &str,
    ) -> Result<ExecutionCount> {
        estimate::estimate(&mut self.memo, graph, outputs, target)
    }

    fn should_invalidate(
        &mut self,
        graph: &PromptGraph,
        previous: &RunSnapshot,
        outputs: &mut OutputsTable,
        target: &str,
    ) -> Result<bool> {
        InvalidationPass {
            catalog: self.catalog.as_ref(),
            memo: &mut self.memo,
            ledger: &mut self.ledger,
        }
        .run(graph, previous, outputs, target)
    }

    fn recorded_fingerprints(&self) -> &HashMap<NodeId, Fingerprint> {
        &self.ledger
    }
}

/// Construct the strategy selected by `kind`.
pub fn strategy_for(kind: Strategy, catalog: Arc<dyn NodeCatalog>) -> Box<dyn ReevalStrategy> {
    debug!(?kind, "constructing re-evaluation strategy");
    match kind {
        Strategy::Memoized => Box::new(MemoizedReeval::new(catalog)),
        Strategy::Baseline => Box::new(BaselineReeval::new(catalog)),
    }
}

/// Construct the strategy selected in configuration.
pub fn strategy_from_config(
    cfg: &ConfigFile,
    catalog: Arc<dyn NodeCatalog>,
) -> Box<dyn ReevalStrategy> {
    strategy_for(cfg.engine.strategy, catalog)
}
