use std::str::FromStr;

use serde::Deserialize;

/// Which re-evaluation implementation the driver constructs.
///
/// - `Memoized`: per-run memoized traversals (default behaviour).
/// - `Baseline`: the unmemoized reference implementation. Same observable
///   semantics, recomputed on every query; intended for differential testing
///   and small graphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Memoized,
    Baseline,
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Memoized
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memoized" => Ok(Strategy::Memoized),
            "baseline" => Ok(Strategy::Baseline),
            other => Err(format!(
                "invalid strategy: {other} (expected \"memoized\" or \"baseline\")"
            )),
        }
    }
}

/// Built-in change-detection hooks assignable to node types in config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    /// Hash the node's fully resolved input values.
    InputHash,
}
