// src/graph/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{Result, RevaldagError};
use crate::graph::model::PromptGraph;

/// Check that the prompt graph is acyclic.
///
/// The re-evaluation core assumes acyclicity and does not verify it; any
/// graph loaded from outside the process goes through this check first.
///
/// Edge direction: producer -> consumer. A topological sort fails exactly
/// when there is a cycle.
pub fn ensure_acyclic(graph: &PromptGraph) -> Result<()> {
    let mut dag: DiGraphMap<&str, ()> = DiGraphMap::new();

    for id in graph.ids() {
        dag.add_node(id);
    }

    for (id, spec) in graph.iter() {
        for edge in spec.edges() {
            // Dangling producers are handled leniently by the core; only
            // known nodes participate in the cycle check.
            if graph.contains(&edge.producer) {
                dag.add_edge(edge.producer.as_str(), id.as_str(), ());
            }
        }
    }

    match toposort(&dag, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(RevaldagError::GraphCycle(format!(
                "cycle detected in prompt graph involving node '{}'",
                node
            )))
        }
    }
}
