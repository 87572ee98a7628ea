// src/graph/model.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Opaque node identifier.
pub type NodeId = String;

/// Index of a producer's output slot.
pub type SlotIndex = usize;

/// Reference to another node's output at a given slot.
///
/// On the wire this is a two-element `[id, slot]` array, which is how the
/// host format distinguishes edges from literal inputs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(NodeId, SlotIndex)", into = "(NodeId, SlotIndex)")]
pub struct EdgeRef {
    pub producer: NodeId,
    pub slot: SlotIndex,
}

impl EdgeRef {
    pub fn new(producer: impl Into<NodeId>, slot: SlotIndex) -> Self {
        Self {
            producer: producer.into(),
            slot,
        }
    }
}

impl From<(NodeId, SlotIndex)> for EdgeRef {
    fn from((producer, slot): (NodeId, SlotIndex)) -> Self {
        Self { producer, slot }
    }
}

impl From<EdgeRef> for (NodeId, SlotIndex) {
    fn from(edge: EdgeRef) -> Self {
        (edge.producer, edge.slot)
    }
}

/// A node input: either the output of another node, or a literal value.
///
/// `Edge` is tried first during deserialization, so any `[id, slot]` shaped
/// array parses as an edge; everything else falls through to `Literal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Edge(EdgeRef),
    Literal(serde_json::Value),
}

impl InputValue {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        InputValue::Literal(value.into())
    }

    pub fn edge(producer: impl Into<NodeId>, slot: SlotIndex) -> Self {
        InputValue::Edge(EdgeRef::new(producer, slot))
    }

    pub fn as_edge(&self) -> Option<&EdgeRef> {
        match self {
            InputValue::Edge(edge) => Some(edge),
            InputValue::Literal(_) => None,
        }
    }
}

/// Specification of a single node: its declared type plus named inputs.
///
/// Inputs are kept in a `BTreeMap` so traversal order is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default)]
    pub inputs: BTreeMap<String, InputValue>,
}

impl NodeSpec {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            inputs: BTreeMap::new(),
        }
    }

    /// The subset of inputs that are edges, in input-name order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeRef> {
        self.inputs.values().filter_map(InputValue::as_edge)
    }
}

/// The prompt graph: node id to node specification.
///
/// Assumed acyclic by the re-evaluation core; `graph::validate` checks this
/// for graphs loaded from disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptGraph {
    nodes: HashMap<NodeId, NodeSpec>,
}

impl PromptGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<NodeId>, spec: NodeSpec) {
        self.nodes.insert(id.into(), spec);
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeSpec)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes no other node consumes (graph sinks), sorted by id.
    ///
    /// These are the usual targets for execution-count estimates.
    pub fn sink_ids(&self) -> Vec<&str> {
        let mut consumed: HashSet<&str> = HashSet::new();
        for spec in self.nodes.values() {
            for edge in spec.edges() {
                consumed.insert(edge.producer.as_str());
            }
        }

        let mut sinks: Vec<&str> = self
            .nodes
            .keys()
            .map(String::as_str)
            .filter(|id| !consumed.contains(id))
            .collect();
        sinks.sort_unstable();
        sinks
    }
}
