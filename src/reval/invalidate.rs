// src/reval/invalidate.rs

//! Output invalidation propagation.
//!
//! Decides, per node, whether a cached output can still be trusted. A `true`
//! verdict evicts the cached entry as part of the same call, so the decision
//! and the eviction cannot drift apart. Upstream verdicts are memoized per
//! (producer, slot), so shared ancestors are traversed at most once per run
//! however many consumers depend on them.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::errors::{Result, RevaldagError};
use crate::graph::{
    Fingerprint, NodeId, NodeSpec, OutputsTable, PromptGraph, RunSnapshot, resolve_inputs,
};
use crate::registry::NodeCatalog;
use crate::reval::memo::{MemoKey, RunMemoStore};

/// Outcome of the per-node checks that need no upstream traversal.
pub(crate) enum LocalDecision {
    /// Verdict known from the node's own state.
    Decided(bool),
    /// Inputs structurally unchanged; verdict depends on the given upstream
    /// edges, checked in input-name order with short-circuiting.
    CheckUpstream(Vec<MemoKey>),
}

/// Per-node checks: fingerprint drift, cache presence, previous-run
/// presence, structural input comparison. Shared by the memoized and
/// baseline passes so their verdicts cannot diverge.
pub(crate) fn enter(
    catalog: &dyn NodeCatalog,
    ledger: &mut HashMap<NodeId, Fingerprint>,
    graph: &PromptGraph,
    previous: &RunSnapshot,
    outputs: &OutputsTable,
    node: &str,
) -> LocalDecision {
    let Some(spec) = graph.node(node) else {
        warn!(node = %node, "edge references a node missing from the graph; invalidating");
        return LocalDecision::Decided(true);
    };

    // The fingerprint is computed and recorded even when nothing is cached,
    // so the ledger is complete for the next run's snapshot.
    let fingerprint_changed = fingerprint_stage(catalog, ledger, previous, outputs, node, spec);

    if !outputs.contains(node) {
        // Nothing cached; the node already requires execution.
        return LocalDecision::Decided(true);
    }
    if fingerprint_changed {
        debug!(node = %node, "fingerprint drift; invalidating");
        return LocalDecision::Decided(true);
    }
    let Some(prev_spec) = previous.node(node) else {
        debug!(node = %node, "node absent from previous run; invalidating");
        return LocalDecision::Decided(true);
    };
    if spec.inputs != prev_spec.inputs {
        debug!(node = %node, "input specification changed; invalidating");
        return LocalDecision::Decided(true);
    }

    LocalDecision::CheckUpstream(spec.edges().map(MemoKey::from).collect())
}

/// Whether the node's fingerprint drifted since the previous run.
///
/// Resolution failure and hook failure both count as drift: an error in
/// change detection must never let a stale output survive.
fn fingerprint_stage(
    catalog: &dyn NodeCatalog,
    ledger: &mut HashMap<NodeId, Fingerprint>,
    previous: &RunSnapshot,
    outputs: &OutputsTable,
    node: &str,
    spec: &NodeSpec,
) -> bool {
    if !catalog.has_change_hook(&spec.node_type) {
        return false;
    }

    let current = match ledger.get(node) {
        Some(fp) => fp.clone(),
        None => {
            let Some(resolved) = resolve_inputs(spec, outputs) else {
                warn!(node = %node, "inputs not yet resolvable for change hook; invalidating");
                return true;
            };
            match catalog.compute_fingerprint(&spec.node_type, &resolved) {
                Ok(fp) => {
                    ledger.insert(node.to_string(), fp.clone());
                    fp
                }
                Err(error) => {
                    warn!(node = %node, %error, "change hook failed; invalidating");
                    return true;
                }
            }
        }
    };

    match previous.fingerprint_of(node) {
        Some(prev) => current != *prev,
        // No previous fingerprint: definitely changed.
        None => true,
    }
}

/// Evict `node`'s cached output when the verdict requires it.
pub(crate) fn evict_if(outputs: &mut OutputsTable, node: &str, verdict: bool) {
    if verdict && outputs.remove(node).is_some() {
        debug!(node = %node, "evicted cached output");
    }
}

struct Frame {
    node: NodeId,
    /// Memo key this frame's verdict is recorded under (`None` for the
    /// top-level target, which is not reached through an edge).
    via: Option<MemoKey>,
    edges: Vec<MemoKey>,
    next: usize,
}

/// The memoized invalidation pass over one target node.
pub(crate) struct InvalidationPass<'a> {
    pub catalog: &'a dyn NodeCatalog,
    pub memo: &'a mut RunMemoStore,
    pub ledger: &'a mut HashMap<NodeId, Fingerprint>,
}

impl InvalidationPass<'_> {
    pub(crate) fn run(
        mut self,
        graph: &PromptGraph,
        previous: &RunSnapshot,
        outputs: &mut OutputsTable,
        target: &str,
    ) -> Result<bool> {
        if graph.node(target).is_none() {
            return Err(RevaldagError::NodeNotFound(target.to_string()));
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut on_stack: HashSet<NodeId> = HashSet::new();
        let mut pending: Option<(NodeId, Option<MemoKey>)> = Some((target.to_string(), None));

        'outer: loop {
            if let Some((node, via)) = pending.take() {
                match enter(self.catalog, self.ledger, graph, previous, outputs, &node) {
                    LocalDecision::Decided(verdict) => {
                        if let Some(final_verdict) = self.settle(outputs, node, via, verdict) {
                            return Ok(final_verdict);
                        }
                    }
                    LocalDecision::CheckUpstream(edges) => {
                        on_stack.insert(node.clone());
                        stack.push(Frame {
                            node,
                            via,
                            edges,
                            next: 0,
                        });
                    }
                }
            }

            let Some(frame) = stack.last_mut() else { break };

            let mut verdict = false;
            while frame.next < frame.edges.len() {
                let key = frame.edges[frame.next].clone();

                if let Some(cached) = self.memo.invalidation(&key) {
                    debug!(
                        producer = %key.producer,
                        slot = key.slot,
                        cached,
                        "invalidation memo hit"
                    );
                    frame.next += 1;
                    if cached {
                        verdict = true;
                        break;
                    }
                    continue;
                }
                if !outputs.contains(&key.producer) {
                    // Nothing cached upstream: already requires execution.
                    frame.next += 1;
                    verdict = true;
                    break;
                }
                if on_stack.contains(&key.producer) {
                    warn!(
                        producer = %key.producer,
                        "dependency cycle during invalidation; invalidating"
                    );
                    frame.next += 1;
                    verdict = true;
                    break;
                }

                // Recurse into the producer; this edge is re-read from the
                // memo once the child settles.
                pending = Some((key.producer.clone(), Some(key)));
                continue 'outer;
            }

            if let Some(done) = stack.pop() {
                on_stack.remove(&done.node);
                if let Some(final_verdict) = self.settle(outputs, done.node, done.via, verdict) {
                    return Ok(final_verdict);
                }
            }
        }

        // Not reached for well-formed traversals; fail toward recomputation.
        Ok(true)
    }

    fn settle(
        &mut self,
        outputs: &mut OutputsTable,
        node: NodeId,
        via: Option<MemoKey>,
        verdict: bool,
    ) -> Option<bool> {
        evict_if(outputs, &node, verdict);
        match via {
            Some(key) => {
                self.memo.record_invalidation(key, verdict);
                None
            }
            None => Some(verdict),
        }
    }
}
