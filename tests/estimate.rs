use revaldag::errors::RevaldagError;
use revaldag::graph::PromptGraph;
use revaldag::reval::{MemoizedReeval, ReevalStrategy};
use revaldag_test_utils::builders::{
    CatalogBuilder, GraphBuilder, NodeSpecBuilder, OutputsBuilder,
};
use revaldag_test_utils::init_tracing;

/// a -> b -> d and a -> c -> d: the classic shared-ancestor shape.
fn diamond() -> PromptGraph {
    GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .with_node(
            "b",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .with_node(
            "c",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .with_node(
            "d",
            NodeSpecBuilder::new("alpha")
                .edge("left", "b", 0)
                .edge("right", "c", 0)
                .build(),
        )
        .build()
}

fn chain() -> PromptGraph {
    GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .with_node(
            "b",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .with_node(
            "c",
            NodeSpecBuilder::new("alpha").edge("source", "b", 0).build(),
        )
        .build()
}

fn memoized() -> MemoizedReeval {
    MemoizedReeval::new(CatalogBuilder::new().plain("alpha").build())
}

#[test]
fn satisfied_target_returns_zero_count() {
    init_tracing();
    let graph = diamond();
    let outputs = OutputsBuilder::new().with_output("d", 1).build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &outputs, "d").unwrap();
    assert_eq!(est.count(), 0);
    assert_eq!(est.node_id(), "d");
    assert!(!est.will_execute());
}

#[test]
fn single_node_counts_itself() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &OutputsBuilder::new().build(), "a").unwrap();
    assert_eq!(est.count(), 1);
}

#[test]
fn chain_counts_each_node_once() {
    init_tracing();
    let graph = chain();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &OutputsBuilder::new().build(), "c").unwrap();
    assert_eq!(est.count(), 3);
}

#[test]
fn satisfied_upstream_is_excluded() {
    init_tracing();
    let graph = chain();
    let outputs = OutputsBuilder::new().with_output("a", 1).build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &outputs, "c").unwrap();
    assert_eq!(est.count(), 2);
}

#[test]
fn diamond_counts_shared_dependency_once() {
    init_tracing();
    let graph = diamond();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &OutputsBuilder::new().build(), "d").unwrap();
    assert_eq!(est.count(), 4, "a must be counted once, not per consumer");
}

#[test]
fn repeated_estimate_is_idempotent_within_a_run() {
    init_tracing();
    let graph = diamond();
    let outputs = OutputsBuilder::new().build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let first = reeval.estimate(&graph, &outputs, "d").unwrap();
    let second = reeval.estimate(&graph, &outputs, "d").unwrap();
    assert_eq!(first.count(), second.count());
    assert_eq!(second.count(), 4);
}

#[test]
fn multiple_edges_to_same_producer_count_once() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .with_node(
            "d",
            NodeSpecBuilder::new("alpha")
                .edge("first", "a", 0)
                .edge("second", "a", 1)
                .build(),
        )
        .build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let est = reeval.estimate(&graph, &OutputsBuilder::new().build(), "d").unwrap();
    assert_eq!(est.count(), 2);
}

#[test]
fn unknown_target_is_an_error() {
    init_tracing();
    let graph = chain();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let err = reeval
        .estimate(&graph, &OutputsBuilder::new().build(), "nope")
        .unwrap_err();
    assert!(matches!(err, RevaldagError::NodeNotFound(_)));
}

#[test]
fn counts_compare_by_magnitude_alone() {
    init_tracing();
    let graph = diamond();
    let outputs = OutputsBuilder::new().build();

    let mut reeval = memoized();
    reeval.reset_run_memo();

    let a = reeval.estimate(&graph, &outputs, "a").unwrap();
    let b = reeval.estimate(&graph, &outputs, "b").unwrap();
    let c = reeval.estimate(&graph, &outputs, "c").unwrap();
    let d = reeval.estimate(&graph, &outputs, "d").unwrap();

    assert!(a < d);
    // b and c have the same magnitude even though they tag different nodes.
    assert_eq!(b, c);

    let mut sorted = vec![d.clone(), a.clone(), c, b];
    sorted.sort();
    assert_eq!(sorted.first().map(|e| e.count()), Some(a.count()));
    assert_eq!(sorted.last().map(|e| e.count()), Some(d.count()));

    // Counts can be folded manually, the way a driver aggregating progress
    // totals would.
    let mut folded = a.clone();
    folded.add(d.count());
    assert_eq!(folded.count(), a.count() + d.count());
}
