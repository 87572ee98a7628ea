// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod registry;
pub mod reval;
pub mod types;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::load_or_default;
use crate::graph::{OutputsTable, PromptGraph, RunSnapshot};
use crate::registry::TypeRegistry;
use crate::reval::{ExecutionCount, strategy_for};
use crate::types::Strategy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and the node-type registry built from it
/// - strategy construction (memoized by default)
/// - graph / snapshot / outputs loading and acyclicity validation
/// - one run: reset, invalidation pass, estimates
/// - the printed report
pub fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(&args.config)?;

    let prompt: PromptGraph = load_json(Path::new(&args.graph))?;
    graph::validate::ensure_acyclic(&prompt)?;

    let previous: RunSnapshot = match &args.previous {
        Some(path) => load_json(Path::new(path))?,
        None => RunSnapshot::default(),
    };
    let mut outputs: OutputsTable = match &args.outputs {
        Some(path) => load_json(Path::new(path))?,
        None => OutputsTable::new(),
    };

    let kind: Strategy = args
        .strategy
        .map(Into::into)
        .unwrap_or(cfg.engine.strategy);
    let catalog = Arc::new(TypeRegistry::from_config(&cfg));
    let mut strategy = strategy_for(kind, catalog);

    // One top-level run: reset first, then invalidate, then estimate.
    strategy.reset_run_memo();

    // Cached outputs for nodes no longer in the graph cannot be reused.
    let stale: Vec<String> = outputs
        .ids()
        .filter(|id| !prompt.contains(id))
        .map(str::to_string)
        .collect();
    for id in &stale {
        outputs.remove(id);
        info!(node = %id, "dropped cached output for node not in the graph");
    }

    let mut node_ids: Vec<String> = prompt.ids().map(str::to_string).collect();
    node_ids.sort_unstable();

    let mut evicted: Vec<String> = Vec::new();
    for id in &node_ids {
        if !outputs.contains(id) {
            continue;
        }
        if strategy.should_invalidate(&prompt, &previous, &mut outputs, id)? {
            evicted.push(id.clone());
        }
    }
    info!(
        invalidated = evicted.len(),
        cached = outputs.len(),
        "invalidation pass complete"
    );

    let targets: Vec<String> = if args.estimate.is_empty() {
        prompt.sink_ids().into_iter().map(str::to_string).collect()
    } else {
        args.estimate.clone()
    };

    let mut estimates: Vec<ExecutionCount> = Vec::new();
    for target in &targets {
        estimates.push(strategy.estimate(&prompt, &outputs, target)?);
    }
    estimates.sort();

    print_report(kind, &evicted, &estimates, &outputs);
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let value =
        serde_json::from_str(&contents).with_context(|| format!("parsing {:?}", path))?;
    Ok(value)
}

/// Report output: what was evicted, what remains, and how much work is left.
fn print_report(
    kind: Strategy,
    evicted: &[String],
    estimates: &[ExecutionCount],
    outputs: &OutputsTable,
) {
    println!("revaldag report");
    println!("  strategy = {kind:?}");
    println!();

    println!("invalidated cached outputs ({}):", evicted.len());
    for id in evicted {
        println!("  - {id}");
    }
    println!();

    println!("execution estimates ({}):", estimates.len());
    for est in estimates {
        println!("  - {}: {} node(s) to execute", est.node_id(), est.count());
    }
    println!();

    println!("cached outputs still valid: {}", outputs.len());
}
