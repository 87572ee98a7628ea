//! Differential tests: the memoized strategy must be indistinguishable from
//! the baseline reference, verdict for verdict and count for count.

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde_json::json;

use revaldag::graph::{Fingerprint, OutputsTable, PromptGraph, RunSnapshot, resolve_inputs};
use revaldag::reval::{BaselineReeval, MemoizedReeval, ReevalStrategy};
use revaldag_test_utils::builders::{CatalogBuilder, GraphBuilder, NodeSpecBuilder};

const MAX_NODES: usize = 8;

fn node_name(i: usize) -> String {
    format!("n{i}")
}

fn node_type(i: usize) -> &'static str {
    match i % 3 {
        0 => "alpha", // no hook
        1 => "beta",  // deterministic hook over resolved inputs
        _ => "gamma", // hook that always fails
    }
}

/// Catalog shared by both strategies under test.
fn catalog() -> Arc<revaldag::registry::TypeRegistry> {
    CatalogBuilder::new()
        .plain("alpha")
        .hooked("beta", |inputs| {
            Ok(Fingerprint::new(serde_json::to_value(inputs)?))
        })
        .hooked("gamma", |_inputs| Err(anyhow::anyhow!("gamma hook failed")))
        .build()
}

/// Build a graph whose node `i` depends only on nodes `< i`, which keeps it
/// acyclic by construction.
fn build_graph(deps: &[Vec<usize>], seed_of: impl Fn(usize) -> u64) -> PromptGraph {
    let mut builder = GraphBuilder::new();
    for (i, potential_deps) in deps.iter().enumerate() {
        let mut spec = NodeSpecBuilder::new(node_type(i)).literal("seed", seed_of(i));

        // Sanitize dependencies: only allow deps < i.
        let mut valid_deps = HashSet::new();
        for &dep_idx in potential_deps {
            if i > 0 {
                valid_deps.insert(dep_idx % i);
            }
        }
        let mut valid_deps: Vec<usize> = valid_deps.into_iter().collect();
        valid_deps.sort_unstable();

        for dep in valid_deps {
            spec = spec.edge(&format!("dep_{dep}"), &node_name(dep), 0);
        }
        builder = builder.with_node(&node_name(i), spec.build());
    }
    builder.build()
}

fn build_outputs(cached: &[bool]) -> OutputsTable {
    let mut outputs = OutputsTable::new();
    for (i, is_cached) in cached.iter().enumerate() {
        if *is_cached {
            outputs.insert(node_name(i), vec![json!(i)]);
        }
    }
    outputs
}

/// Previous fingerprint table driven by a per-node code:
/// 0 = absent, 1 = mismatched, 2 = matching what the beta hook would compute.
fn build_snapshot(
    previous_graph: PromptGraph,
    outputs: &OutputsTable,
    fp_codes: &[u8],
) -> RunSnapshot {
    let mut fingerprints = std::collections::HashMap::new();
    for (i, code) in fp_codes.iter().enumerate() {
        let id = node_name(i);
        match code % 3 {
            0 => {}
            1 => {
                fingerprints.insert(id, Fingerprint::new("mismatch"));
            }
            _ => {
                if node_type(i) == "beta" {
                    if let Some(spec) = previous_graph.node(&id) {
                        if let Some(resolved) = resolve_inputs(spec, outputs) {
                            if let Ok(value) = serde_json::to_value(&resolved) {
                                fingerprints.insert(id, Fingerprint::new(value));
                            }
                        }
                    }
                }
            }
        }
    }
    RunSnapshot::new(previous_graph, fingerprints)
}

proptest! {
    #[test]
    fn memoized_and_baseline_agree(
        deps in proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..MAX_NODES),
            2..=MAX_NODES,
        ),
        cached in proptest::collection::vec(any::<bool>(), MAX_NODES),
        bumped in proptest::collection::vec(any::<bool>(), MAX_NODES),
        fp_codes in proptest::collection::vec(any::<u8>(), MAX_NODES),
    ) {
        let n = deps.len();
        let graph = build_graph(&deps, |i| i as u64);
        // The previous run's graph may differ in some literals.
        let previous_graph = build_graph(&deps, |i| {
            if bumped[i] { i as u64 + 100 } else { i as u64 }
        });

        let outputs = build_outputs(&cached[..n]);
        let previous = build_snapshot(previous_graph, &outputs, &fp_codes[..n]);

        let shared_catalog = catalog();
        let mut memoized = MemoizedReeval::new(shared_catalog.clone());
        let mut baseline = BaselineReeval::new(shared_catalog);

        memoized.reset_run_memo();
        baseline.reset_run_memo();

        let mut outputs_m = outputs.clone();
        let mut outputs_b = outputs.clone();

        // Invalidation pass over every cached node, in id order.
        for i in 0..n {
            let id = node_name(i);
            prop_assert_eq!(outputs_m.contains(&id), outputs_b.contains(&id));
            if !outputs_m.contains(&id) {
                continue;
            }

            let verdict_m = memoized
                .should_invalidate(&graph, &previous, &mut outputs_m, &id)
                .unwrap();
            let verdict_b = baseline
                .should_invalidate(&graph, &previous, &mut outputs_b, &id)
                .unwrap();
            prop_assert_eq!(verdict_m, verdict_b, "verdict mismatch for {}", id);
        }
        prop_assert_eq!(&outputs_m, &outputs_b, "evictions diverged");

        // Estimates for every node, including repeats for idempotence.
        for i in 0..n {
            let id = node_name(i);
            let est_m = memoized.estimate(&graph, &outputs_m, &id).unwrap();
            let est_b = baseline.estimate(&graph, &outputs_b, &id).unwrap();
            prop_assert_eq!(est_m.count(), est_b.count(), "estimate mismatch for {}", id);

            let est_m_again = memoized.estimate(&graph, &outputs_m, &id).unwrap();
            prop_assert_eq!(est_m.count(), est_m_again.count());
        }
    }
}
