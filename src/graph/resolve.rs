use std::collections::BTreeMap;

use crate::graph::model::{InputValue, NodeSpec};
use crate::graph::outputs::OutputsTable;

/// Fully resolved argument values for one node, keyed by input name.
pub type ResolvedInputs = BTreeMap<String, serde_json::Value>;

/// Resolve a node's input specification against the outputs table.
///
/// Literals pass through unchanged; edge references read the producer's slot
/// value. Returns `None` as soon as any edge cannot be resolved (producer
/// output missing, or slot out of range), signalling "not yet available".
pub fn resolve_inputs(spec: &NodeSpec, outputs: &OutputsTable) -> Option<ResolvedInputs> {
    let mut resolved = ResolvedInputs::new();

    for (name, input) in &spec.inputs {
        let value = match input {
            InputValue::Literal(value) => value.clone(),
            InputValue::Edge(edge) => outputs.slot(&edge.producer, edge.slot)?.clone(),
        };
        resolved.insert(name.clone(), value);
    }

    Some(resolved)
}
