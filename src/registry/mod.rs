// src/registry/mod.rs

//! Node-type catalog: what the invalidation pass knows about node types.
//!
//! The catalog is consumed through the [`NodeCatalog`] trait so hosts can
//! bring their own registry; [`TypeRegistry`] is the concrete implementation
//! used by the CLI driver and tests, populated from configuration.

pub mod hooks;

pub use hooks::{ChangeHook, InputHashHook};

use std::collections::HashMap;

use anyhow::{Result, bail};
use tracing::warn;

use crate::config::model::ConfigFile;
use crate::graph::{Fingerprint, ResolvedInputs};
use crate::types::HookKind;

/// External node-type registry consumed by the invalidation pass.
pub trait NodeCatalog: Send + Sync {
    /// Whether `node_type` declares a change-detection hook.
    fn has_change_hook(&self, node_type: &str) -> bool;

    /// Invoke the hook for `node_type` with fully resolved input values.
    ///
    /// Errors are converted into forced invalidation by the caller, never
    /// surfaced further.
    fn compute_fingerprint(&self, node_type: &str, inputs: &ResolvedInputs) -> Result<Fingerprint>;
}

/// Definition of a single node type.
pub struct NodeTypeDef {
    change_hook: Option<Box<dyn ChangeHook>>,
}

impl NodeTypeDef {
    /// A node type without change detection.
    pub fn plain() -> Self {
        Self { change_hook: None }
    }

    /// A node type with the given change-detection hook.
    pub fn with_hook(hook: impl ChangeHook + 'static) -> Self {
        Self {
            change_hook: Some(Box::new(hook)),
        }
    }
}

/// Concrete [`NodeCatalog`] backed by a type-name map.
#[derive(Default)]
pub struct TypeRegistry {
    types: HashMap<String, NodeTypeDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node_type: impl Into<String>, def: NodeTypeDef) {
        self.types.insert(node_type.into(), def);
    }

    /// Build a registry from the `[node_type.*]` config sections.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let mut registry = Self::new();
        for (name, tc) in cfg.node_type.iter() {
            let def = match tc.change_hook {
                Some(HookKind::InputHash) => NodeTypeDef::with_hook(InputHashHook),
                None => NodeTypeDef::plain(),
            };
            registry.register(name.clone(), def);
        }
        registry
    }
}

impl NodeCatalog for TypeRegistry {
    fn has_change_hook(&self, node_type: &str) -> bool {
        match self.types.get(node_type) {
            Some(def) => def.change_hook.is_some(),
            None => {
                warn!(node_type = %node_type, "node type not registered; treating as hook-less");
                false
            }
        }
    }

    fn compute_fingerprint(&self, node_type: &str, inputs: &ResolvedInputs) -> Result<Fingerprint> {
        match self.types.get(node_type).and_then(|def| def.change_hook.as_ref()) {
            Some(hook) => hook.fingerprint(inputs),
            None => bail!("node type '{node_type}' declares no change hook"),
        }
    }
}
