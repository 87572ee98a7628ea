// src/graph/mod.rs

//! Prompt-graph data model shared by both re-evaluation algorithms.
//!
//! - [`model`] holds the graph itself: nodes, inputs, edge references.
//! - [`outputs`] is the mutable table of already-computed node outputs.
//! - [`snapshot`] captures the previous run for drift detection.
//! - [`resolve`] turns input specifications into concrete argument values.
//! - [`validate`] checks acyclicity before a graph reaches the core.

pub mod model;
pub mod outputs;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use model::{EdgeRef, InputValue, NodeId, NodeSpec, PromptGraph, SlotIndex};
pub use outputs::OutputsTable;
pub use resolve::{ResolvedInputs, resolve_inputs};
pub use snapshot::{Fingerprint, RunSnapshot};
