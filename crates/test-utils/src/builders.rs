use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use revaldag::graph::{
    Fingerprint, InputValue, NodeSpec, OutputsTable, PromptGraph, ResolvedInputs, RunSnapshot,
    SlotIndex,
};
use revaldag::registry::{ChangeHook, NodeTypeDef, TypeRegistry};

/// Builder for `PromptGraph` to simplify test setup.
pub struct GraphBuilder {
    graph: PromptGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            graph: PromptGraph::new(),
        }
    }

    pub fn with_node(mut self, id: &str, spec: NodeSpec) -> Self {
        self.graph.insert(id, spec);
        self
    }

    pub fn build(self) -> PromptGraph {
        self.graph
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `NodeSpec`.
pub struct NodeSpecBuilder {
    spec: NodeSpec,
}

impl NodeSpecBuilder {
    pub fn new(node_type: &str) -> Self {
        Self {
            spec: NodeSpec::new(node_type),
        }
    }

    pub fn literal(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.spec
            .inputs
            .insert(name.to_string(), InputValue::literal(value));
        self
    }

    pub fn edge(mut self, name: &str, producer: &str, slot: SlotIndex) -> Self {
        self.spec
            .inputs
            .insert(name.to_string(), InputValue::edge(producer, slot));
        self
    }

    pub fn build(self) -> NodeSpec {
        self.spec
    }
}

/// Builder for `RunSnapshot`.
pub struct SnapshotBuilder {
    graph: PromptGraph,
    fingerprints: HashMap<String, Fingerprint>,
}

impl SnapshotBuilder {
    /// Snapshot whose previous graph is a copy of the given one.
    pub fn of(graph: &PromptGraph) -> Self {
        Self {
            graph: graph.clone(),
            fingerprints: HashMap::new(),
        }
    }

    pub fn fingerprint(mut self, node: &str, value: impl Into<Value>) -> Self {
        self.fingerprints
            .insert(node.to_string(), Fingerprint::new(value));
        self
    }

    pub fn build(self) -> RunSnapshot {
        RunSnapshot::new(self.graph, self.fingerprints)
    }
}

/// Builder for `OutputsTable`.
pub struct OutputsBuilder {
    outputs: OutputsTable,
}

impl OutputsBuilder {
    pub fn new() -> Self {
        Self {
            outputs: OutputsTable::new(),
        }
    }

    /// Cache a single slot-0 output for a node.
    pub fn with_output(mut self, node: &str, value: impl Into<Value>) -> Self {
        self.outputs.insert(node, vec![value.into()]);
        self
    }

    /// Cache per-slot outputs for a node.
    pub fn with_slots(mut self, node: &str, values: Vec<Value>) -> Self {
        self.outputs.insert(node, values);
        self
    }

    pub fn build(self) -> OutputsTable {
        self.outputs
    }
}

impl Default for OutputsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a `TypeRegistry` with closure-backed hooks.
pub struct CatalogBuilder {
    registry: TypeRegistry,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::new(),
        }
    }

    /// Register a node type without change detection.
    pub fn plain(mut self, node_type: &str) -> Self {
        self.registry.register(node_type, NodeTypeDef::plain());
        self
    }

    /// Register a node type with a closure hook.
    pub fn hooked<F>(mut self, node_type: &str, hook: F) -> Self
    where
        F: Fn(&ResolvedInputs) -> anyhow::Result<Fingerprint> + Send + Sync + 'static,
    {
        self.registry
            .register(node_type, NodeTypeDef::with_hook(hook));
        self
    }

    /// Register a node type with any `ChangeHook` implementation.
    pub fn with_hook(mut self, node_type: &str, hook: impl ChangeHook + 'static) -> Self {
        self.registry
            .register(node_type, NodeTypeDef::with_hook(hook));
        self
    }

    pub fn build(self) -> Arc<TypeRegistry> {
        Arc::new(self.registry)
    }
}

impl Default for CatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
