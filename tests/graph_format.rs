use serde_json::json;

use revaldag::errors::RevaldagError;
use revaldag::graph::validate::ensure_acyclic;
use revaldag::graph::{InputValue, PromptGraph, resolve_inputs};
use revaldag_test_utils::builders::{GraphBuilder, NodeSpecBuilder, OutputsBuilder};
use revaldag_test_utils::init_tracing;

#[test]
fn edge_arrays_parse_as_edges_and_scalars_as_literals() {
    init_tracing();
    let raw = r#"{
        "2": {"type": "loader", "inputs": {"path": "img.png"}},
        "4": {"type": "sampler", "inputs": {"model": ["2", 0], "seed": 42}}
    }"#;

    let graph: PromptGraph = serde_json::from_str(raw).unwrap();
    let spec = graph.node("4").unwrap();

    match &spec.inputs["model"] {
        InputValue::Edge(edge) => {
            assert_eq!(edge.producer, "2");
            assert_eq!(edge.slot, 0);
        }
        other => panic!("expected edge, got {other:?}"),
    }
    assert!(matches!(&spec.inputs["seed"], InputValue::Literal(v) if *v == json!(42)));
    assert!(matches!(
        &graph.node("2").unwrap().inputs["path"],
        InputValue::Literal(_)
    ));
}

#[test]
fn graph_round_trips_through_json() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node(
            "a",
            NodeSpecBuilder::new("loader").literal("path", "x.png").build(),
        )
        .with_node(
            "b",
            NodeSpecBuilder::new("sampler")
                .edge("image", "a", 0)
                .literal("steps", 20)
                .build(),
        )
        .build();

    let encoded = serde_json::to_string(&graph).unwrap();
    let decoded: PromptGraph = serde_json::from_str(&encoded).unwrap();
    assert_eq!(graph, decoded);
}

#[test]
fn cycle_is_rejected_at_load_time() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node(
            "a",
            NodeSpecBuilder::new("alpha").edge("source", "b", 0).build(),
        )
        .with_node(
            "b",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .build();

    let err = ensure_acyclic(&graph).unwrap_err();
    assert!(matches!(err, RevaldagError::GraphCycle(_)));
}

#[test]
fn acyclic_graph_passes_validation() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .with_node(
            "b",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .build();

    assert!(ensure_acyclic(&graph).is_ok());
}

#[test]
fn sinks_are_the_unconsumed_nodes() {
    init_tracing();
    let graph = GraphBuilder::new()
        .with_node("a", NodeSpecBuilder::new("alpha").literal("seed", 1).build())
        .with_node(
            "b",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .with_node(
            "c",
            NodeSpecBuilder::new("alpha").edge("source", "a", 0).build(),
        )
        .build();

    assert_eq!(graph.sink_ids(), vec!["b", "c"]);
}

#[test]
fn resolve_reads_literals_and_producer_slots() {
    init_tracing();
    let spec = NodeSpecBuilder::new("sampler")
        .literal("steps", 20)
        .edge("image", "p", 1)
        .build();
    let outputs = OutputsBuilder::new()
        .with_slots("p", vec![json!("slot0"), json!("slot1")])
        .build();

    let resolved = resolve_inputs(&spec, &outputs).unwrap();
    assert_eq!(resolved["steps"], json!(20));
    assert_eq!(resolved["image"], json!("slot1"));
}

#[test]
fn resolve_signals_not_yet_available() {
    init_tracing();
    let spec = NodeSpecBuilder::new("sampler").edge("image", "p", 0).build();

    // Producer output missing entirely.
    assert!(resolve_inputs(&spec, &OutputsBuilder::new().build()).is_none());

    // Producer present but slot out of range.
    let spec_far_slot = NodeSpecBuilder::new("sampler").edge("image", "p", 5).build();
    let outputs = OutputsBuilder::new().with_slots("p", vec![json!(1)]).build();
    assert!(resolve_inputs(&spec_far_slot, &outputs).is_none());
}
