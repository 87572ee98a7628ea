// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{HookKind, Strategy};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [engine]
/// strategy = "memoized"
///
/// [node_type.load_image]
/// change_hook = "input-hash"
///
/// [node_type.sampler]
/// ```
///
/// All sections are optional and have reasonable defaults, so an absent or
/// empty config file is perfectly usable.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Engine behaviour from `[engine]`.
    #[serde(default)]
    pub engine: EngineSection,

    /// All node types from `[node_type.<name>]`.
    ///
    /// Keys are the *node type names* as they appear in prompt graphs.
    #[serde(default)]
    pub node_type: BTreeMap<String, NodeTypeConfig>,
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// `"memoized"` (default) or `"baseline"`.
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
        }
    }
}

/// `[node_type.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeTypeConfig {
    /// Optional change-detection hook for this node type.
    ///
    /// Types without one are considered unconditionally stable as long as
    /// their inputs and upstream dependencies are unchanged.
    #[serde(default)]
    pub change_hook: Option<HookKind>,
}

/// Validated configuration.
///
/// Constructed via `TryFrom<RawConfigFile>` (see `config::validate`), which
/// is the only place allowed to create one.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub engine: EngineSection,
    pub node_type: BTreeMap<String, NodeTypeConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        engine: EngineSection,
        node_type: BTreeMap<String, NodeTypeConfig>,
    ) -> Self {
        Self { engine, node_type }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            engine: EngineSection::default(),
            node_type: BTreeMap::new(),
        }
    }
}
