// src/reval/estimate.rs

//! Execution-count estimation.
//!
//! One explicit-stack walk per call: every distinct not-yet-satisfied
//! ancestor of the target is counted exactly once, however many edges lead
//! to it. Completed results are memoized per target for the rest of the run,
//! so repeated estimates (the common pattern when a driver re-sorts pending
//! outputs by remaining work) cost one lookup.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::errors::{Result, RevaldagError};
use crate::graph::{NodeId, OutputsTable, PromptGraph};
use crate::reval::count::ExecutionCount;
use crate::reval::memo::RunMemoStore;

pub(crate) fn estimate(
    memo: &mut RunMemoStore,
    graph: &PromptGraph,
    outputs: &OutputsTable,
    target: &str,
) -> Result<ExecutionCount> {
    if outputs.contains(target) {
        // Already satisfied; nothing left to execute for this target.
        return Ok(ExecutionCount::satisfied(target));
    }
    if let Some(cached) = memo.will_execute(target) {
        debug!(node = %target, count = cached.count(), "estimate memo hit");
        return Ok(cached.clone());
    }
    if graph.node(target).is_none() {
        return Err(RevaldagError::NodeNotFound(target.to_string()));
    }

    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(target.to_string());

    let mut stack: Vec<NodeId> = vec![target.to_string()];
    let mut count: u64 = 0;

    while let Some(node) = stack.pop() {
        let Some(spec) = graph.node(&node) else {
            continue;
        };
        count += 1;

        for edge in spec.edges() {
            let producer = &edge.producer;
            if !visited.insert(producer.clone()) {
                // Already counted in this walk.
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
            stack.push(producer.clone());
        }
    }

    let result = ExecutionCount::with_count(target, count);
    memo.record_will_execute(result.clone());
    debug!(node = %target, count = result.count(), "estimate complete");
    Ok(result)
}
