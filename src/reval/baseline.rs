// src/reval/baseline.rs

//! Unmemoized reference implementation of [`ReevalStrategy`].
//!
//! Same observable semantics as the memoized strategy, recomputed on every
//! query with plain recursion. It exists so drivers can swap implementations
//! without behavioural change, and as the oracle for differential tests.
//! Suitable for small graphs; the memoized strategy is the production path.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::warn;

use crate::errors::{Result, RevaldagError};
use crate::graph::{Fingerprint, NodeId, OutputsTable, PromptGraph, RunSnapshot};
use crate::registry::NodeCatalog;
use crate::reval::count::ExecutionCount;
use crate::reval::invalidate::{LocalDecision, enter, evict_if};
use crate::reval::strategy::ReevalStrategy;

pub struct BaselineReeval {
    catalog: Arc<dyn NodeCatalog>,
    ledger: HashMap<NodeId, Fingerprint>,
}

impl BaselineReeval {
    pub fn new(catalog: Arc<dyn NodeCatalog>) -> Self {
        Self {
            catalog,
            ledger: HashMap::new(),
        }
    }

    fn walk_count(
        graph: &PromptGraph,
        outputs: &OutputsTable,
        visited: &mut HashSet<NodeId>,
        node: &str,
    ) -> u64 {
        let Some(spec) = graph.node(node) else {
            return 0;
        };

        let mut count = 1;
        for edge in spec.edges() {
            let producer = &edge.producer;
            if !visited.insert(producer.clone()) {
                continue;
            }
            if outputs.contains(producer) {
                continue;
            }
            if graph.node(producer).is_none() {
                warn!(
                    node = %producer,
                    "edge references a node missing from the graph; contributing nothing"
                );
                continue;
            }
            count += Self::walk_count(graph, outputs, visited, producer);
        }
        count
    }

    fn check(
        &mut self,
        graph: &PromptGraph,
        previous: &RunSnapshot,
        outputs: &mut OutputsTable,
        node: &str,
    ) -> bool {
        let verdict = match enter(
            self.catalog.as_ref(),
            &mut self.ledger,
            graph,
            previous,
            outputs,
            node,
        ) {
            LocalDecision::Decided(verdict) => verdict,
            LocalDecision::CheckUpstream(edges) => {
                let mut stale = false;
                for key in edges {
                    stale = if !outputs.contains(&key.producer) {
                        true
                    } else {
                        self.check(graph, previous, outputs, &key.producer)
                    };
                    if stale {
                        break;
                    }
                }
                stale
            }
        };

        evict_if(outputs, node, verdict);
        verdict
    }
}

impl ReevalStrategy for BaselineReeval {
    fn reset_run_memo(&mut self) {
        self.ledger.clear();
    }

    fn estimate(
        &mut self,
        graph: &PromptGraph,
        outputs: &OutputsTable,
        target: &str,
    ) -> Result<ExecutionCount> {
        if outputs.contains(target) {
            return Ok(ExecutionCount::satisfied(target));
        }
        if graph.node(target).is_none() {
            return Err(RevaldagError::NodeNotFound(target.to_string()));
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        visited.insert(target.to_string());
        let count = Self::walk_count(graph, outputs, &mut visited, target);
        Ok(ExecutionCount::with_count(target, count))
    }

    fn should_invalidate(
        &mut self,
        graph: &PromptGraph,
        previous: &RunSnapshot,
        outputs: &mut OutputsTable,
        target: &str,
    ) -> Result<bool> {
        if graph.node(target).is_none() {
            return Err(RevaldagError::NodeNotFound(target.to_string()));
        }
        Ok(self.check(graph, previous, outputs, target))
    }

    fn recorded_fingerprints(&self) -> &HashMap<NodeId, Fingerprint> {
        &self.ledger
    }
}
