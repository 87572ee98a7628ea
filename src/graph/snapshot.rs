// src/graph/snapshot.rs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::model::{NodeId, NodeSpec, PromptGraph};

/// Opaque comparable value summarizing whether a node's output would change
/// if re-derived. Produced by a node-type change hook; equal fingerprints
/// across runs mean the output can be trusted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(serde_json::Value);

impl Fingerprint {
    pub fn new(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<serde_json::Value> for Fingerprint {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// What the previous top-level run looked like.
///
/// Holds the previous graph (which doubles as the source of previous input
/// specifications for structural comparison) and the fingerprints recorded
/// for nodes during that run. Absence of a node or fingerprint is treated as
/// "definitely changed" by the invalidation pass, never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSnapshot {
    #[serde(default)]
    graph: PromptGraph,

    #[serde(default)]
    fingerprints: HashMap<NodeId, Fingerprint>,
}

impl RunSnapshot {
    pub fn new(graph: PromptGraph, fingerprints: HashMap<NodeId, Fingerprint>) -> Self {
        Self {
            graph,
            fingerprints,
        }
    }

    pub fn graph(&self) -> &PromptGraph {
        &self.graph
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.graph.node(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.graph.contains(id)
    }

    pub fn fingerprint_of(&self, id: &str) -> Option<&Fingerprint> {
        self.fingerprints.get(id)
    }
}
